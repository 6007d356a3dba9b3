//! SnapSelect Host Abstraction Layer
//!
//! This crate provides the host-agnostic traits and types that the SnapSelect
//! widget consumes: element-tree manipulation, geometry queries, and event
//! subscription.
//!
//! # Architecture
//!
//! The host abstraction is built around two traits:
//!
//! - [`Document`] - The element tree, form state, geometry, and listener registry
//! - [`EventQueue`] - Pending host events waiting to be routed
//!
//! # Host Implementations
//!
//! - `snapselect_platform_headless` - In-memory document used by tests and embedders
//!
//! # Example
//!
//! ```ignore
//! use snapselect_platform::*;
//!
//! fn pump<D: Document + EventQueue>(doc: &mut D) {
//!     while let Some(event) = doc.next_event() {
//!         for listener in doc.dispatch_path(&event) {
//!             // Route `listener` to whoever registered it
//!         }
//!     }
//! }
//! ```

mod document;
mod error;
mod event;
mod geometry;
mod input;

// Re-export all public types
pub use document::{Document, ListenerId, NodeId};
pub use error::{PlatformError, Result};
pub use event::{DomEvent, EventKind, EventQueue, EventTarget, Propagation};
pub use geometry::{Rect, Viewport};
pub use input::{Key, KeyboardEvent};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::document::{Document, ListenerId, NodeId};
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{DomEvent, EventKind, EventQueue, EventTarget, Propagation};
    pub use crate::geometry::{Rect, Viewport};
    pub use crate::input::{Key, KeyboardEvent};
}
