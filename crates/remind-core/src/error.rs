use thiserror::Error;

/// Errors raised by the shared core: config loading and value parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("Invalid repeat policy: {0:?} (expected once|daily|weekly|monthly)")]
    InvalidRepeat(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
