use async_trait::async_trait;
use thiserror::Error;

/// Why a single delivery attempt failed. Per-item and non-fatal: the
/// dispatch loop logs it and moves on to the next reminder.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport-level failure, including the bounded send timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The messaging API answered with a non-success status.
    #[error("messaging API returned status {status}")]
    Api { status: u16 },
}

/// Outbound delivery seam.
///
/// `text` is the fully rendered message; implementations send it verbatim.
/// Calls must be bounded by a fixed timeout so one slow delivery cannot
/// stall the batch.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> std::result::Result<(), NotifyError>;
}
