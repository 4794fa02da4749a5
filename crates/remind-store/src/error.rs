use thiserror::Error;

/// Errors that can occur within the reminder store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error — fatal to the invocation.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A required field is missing or malformed; detected before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
