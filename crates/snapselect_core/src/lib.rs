//! SnapSelect Core
//!
//! The host-independent half of the SnapSelect widget:
//!
//! - **Option Model**: Reads entries from the native control and writes selection back
//! - **Selection State**: Multi/single selection with ceiling and empty-policy rules
//! - **Filter Engine**: Case-insensitive substring visibility for live search
//! - **Configuration**: Three-tier resolution of markup, constructor, and default options
//!
//! # Example
//!
//! ```rust
//! use snapselect_core::config::SelectionLimit;
//! use snapselect_core::selection::MultiSelection;
//!
//! let mut selection = MultiSelection::new(SelectionLimit::AtMost(2));
//! selection.toggle("a");
//! selection.toggle("b");
//!
//! // The ceiling rejects a third value
//! assert!(!selection.toggle("c"));
//! assert_eq!(selection.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod options;
pub mod selection;

pub use config::{resolve, SelectConfig, SelectOptions, SelectionLimit, DEFAULT_PLACEHOLDER};
pub use error::{Result, SnapSelectError};
pub use filter::{EntryVisibility, FilterState, Visibility};
pub use options::{ControlDescriptor, Entry, Optgroup, OptionModel, PlainOption};
pub use selection::{MultiSelection, Selection, SingleSelection};
