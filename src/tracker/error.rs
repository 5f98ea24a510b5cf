use thiserror::Error;

/// Errors raised by the pose registry.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A caller-supplied argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
