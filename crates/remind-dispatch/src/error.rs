use thiserror::Error;

/// Errors that abort a whole dispatch pass. Per-item delivery failures are
/// not represented here; they are logged and the batch continues.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Store error: {0}")]
    Store(#[from] remind_store::StoreError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
