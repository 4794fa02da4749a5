/// Errors raised while constructing the Telegram adapter.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("no bot token configured")]
    NoToken,

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}
