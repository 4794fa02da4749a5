use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Bound on per-pass work: the dispatcher never selects more than this many rows.
pub const DEFAULT_BATCH_LIMIT: u32 = 50;
/// Cadence of the background dispatch loop.
pub const DEFAULT_POLL_SECS: u64 = 60;
/// One slow Telegram call must not stall the batch indefinitely.
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

/// Top-level config (remind.toml + REMIND__* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemindConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Credential for the outbound messaging channel. When the token is absent
/// the gateway still serves CRUD; dispatch is disabled.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u32,
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            poll_secs: DEFAULT_POLL_SECS,
            send_timeout_secs: DEFAULT_SEND_TIMEOUT_SECS,
        }
    }
}

impl RemindConfig {
    /// Load config from `config_path` (or the default location) merged with
    /// `REMIND__`-prefixed environment overrides. The double-underscore
    /// separator keeps multi-word keys intact, e.g.
    /// `REMIND__TELEGRAM__BOT_TOKEN` → `telegram.bot_token`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: RemindConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("REMIND__").split("__"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.remind/remind.toml", home)
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.remind/remind.db", home)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_batch_limit() -> u32 {
    DEFAULT_BATCH_LIMIT
}

fn default_poll_secs() -> u64 {
    DEFAULT_POLL_SECS
}

fn default_send_timeout_secs() -> u64 {
    DEFAULT_SEND_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = RemindConfig::default();
        assert_eq!(cfg.gateway.port, DEFAULT_PORT);
        assert_eq!(cfg.gateway.bind, DEFAULT_BIND);
        assert_eq!(cfg.dispatch.batch_limit, 50);
        assert_eq!(cfg.dispatch.send_timeout_secs, 10);
        assert!(cfg.telegram.bot_token.is_none());
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let cfg: RemindConfig = Figment::new()
            .merge(figment::providers::Serialized::defaults(serde_json::json!({
                "gateway": { "port": 9000 }
            })))
            .extract()
            .unwrap();
        assert_eq!(cfg.gateway.port, 9000);
        assert_eq!(cfg.gateway.bind, DEFAULT_BIND);
        assert_eq!(cfg.dispatch.poll_secs, DEFAULT_POLL_SECS);
    }
}
