//! SnapSelect
//!
//! A tag-based dropdown for native `select` controls, driven through the
//! host-agnostic [`Document`](snapselect_platform::Document) trait.
//!
//! # Modules
//!
//! - [`widget`] - The [`SnapSelect`] handle: construction, selection, open/close
//! - [`panel`] - Floating panel lifecycle and its state machine
//! - [`display`] - Trigger repaint (tags, placeholder, single label)
//! - [`position`] - Panel placement below the trigger
//! - [`registry`] - The page-wide "one open panel" slot
//! - [`router`] - Routing host events to widgets
//! - [`tasks`] - Deferred one-shot tasks
//! - [`batch`] - Selector-based construction
//!
//! # Example
//!
//! ```rust
//! use snapselect::{snap_select, EventRouter};
//! use snapselect_core::SelectOptions;
//! use snapselect_platform::Document;
//! use snapselect_platform_headless::HeadlessDocument;
//!
//! let mut doc = HeadlessDocument::new();
//! let body = doc.body();
//! let control = doc.add_select(body, true);
//! doc.add_option(control, "a", "Apple");
//! doc.add_option(control, "b", "Banana");
//!
//! let options = SelectOptions::new().live_search(true).max_selections(1);
//! let widgets = snap_select(&mut doc, "select", &options).unwrap().into_vec();
//!
//! let mut router = EventRouter::new();
//! router.register_all(widgets.iter().cloned());
//! router.run_until_idle(&mut doc);
//!
//! assert!(widgets[0].selected_values().is_empty());
//! ```

pub mod batch;
pub mod binding;
pub mod display;
mod input;
pub mod panel;
pub mod position;
pub mod registry;
pub mod router;
pub mod tasks;
pub mod widget;

pub use batch::{snap_select, Instances};
pub use panel::{PanelEvent, PanelState};
pub use registry::{close_open_panel, open_widget};
pub use router::EventRouter;
pub use widget::{SnapSelect, WidgetId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{snap_select, Instances};
    pub use crate::router::EventRouter;
    pub use crate::widget::{SnapSelect, WidgetId};
    pub use snapselect_core::{SelectConfig, SelectOptions, SelectionLimit};
}
