use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Gadget write failed [{path}]: {reason} (code: {error_code})")]
    Gadget {
        path: String,
        reason: String,
        error_code: String,
    },

    #[error("Input device error [{device}]: {reason}")]
    Source { device: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
