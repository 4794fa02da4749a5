//! `remind-telegram` — Telegram Bot API delivery.
//!
//! One method is enough: `sendMessage`, fire-and-forget. The response body
//! is ignored beyond success/failure, and every call is bounded by the
//! client's fixed timeout so a slow Telegram cannot stall a dispatch pass.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use remind_dispatch::{Notifier, NotifyError};

pub mod error;

pub use error::TelegramError;

const API_BASE: &str = "https://api.telegram.org";

/// Sends rendered reminder messages through the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    send_url: String,
}

impl TelegramNotifier {
    /// Build a notifier for `token`, with `timeout` applied to every send.
    ///
    /// Fails with [`TelegramError::NoToken`] when the token is absent or
    /// blank; the caller decides whether that disables dispatch or aborts
    /// startup.
    pub fn new(token: Option<&str>, timeout: Duration) -> Result<Self, TelegramError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TelegramError::NoToken)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            send_url: format!("{API_BASE}/bot{token}/sendMessage"),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let resp = self
            .client
            .post(&self.send_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Api {
                status: status.as_u16(),
            });
        }

        debug!(chat_id, "telegram message sent");
        Ok(())
    }
}
