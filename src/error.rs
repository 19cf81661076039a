//! Error types for the mask-fit library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed landmark frame or frame dimensions
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Pixel-to-millimeter calibration could not be performed
    #[error("Calibration error: {0}")]
    Calibration(String),

    /// A record was added to a scan buffer that is already full
    #[error("Scan buffer full: capacity {capacity}")]
    BufferFull {
        /// Capacity of the buffer that rejected the record
        capacity: usize,
    },

    /// An operation was invoked before the state it depends on exists.
    /// This is a caller defect, not a user-facing condition.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
