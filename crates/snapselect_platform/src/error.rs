//! Host error types

use thiserror::Error;

/// Host-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Selector could not be parsed by the host
    #[error("Invalid selector: {0:?}")]
    InvalidSelector(String),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, PlatformError>;
