//! SnapSelect error types

use snapselect_platform::{NodeId, PlatformError};
use thiserror::Error;

/// Errors raised while constructing a widget or loading its options
///
/// Selection operations never fail; out-of-range requests are rejected
/// silently by the selection policy instead.
#[derive(Error, Debug)]
pub enum SnapSelectError {
    /// The node handed to the constructor is not a `select` element
    #[error("Node {0:?} is not a select control")]
    NotASelectControl(NodeId),

    /// The control has no parent to insert the widget container into
    #[error("Select control {0:?} is not attached to a parent")]
    Detached(NodeId),

    /// A TOML options document could not be parsed
    #[error("Invalid TOML options: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// A JSON options document could not be parsed
    #[error("Invalid JSON options: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Host error
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for SnapSelect operations
pub type Result<T> = std::result::Result<T, SnapSelectError>;
