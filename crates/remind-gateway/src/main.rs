use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

mod app;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remind_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: REMIND_CONFIG env > ~/.remind/remind.toml
    let config_path = std::env::var("REMIND_CONFIG").ok();
    let config = remind_core::RemindConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({e}), using defaults");
        remind_core::RemindConfig::default()
    });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(&db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;
    remind_store::db::init_db(&db)?;
    drop(db);
    info!("database migrations complete");

    // handlers and the dispatch engine each get their own connection
    let store = remind_store::ReminderStore::new(rusqlite::Connection::open(&db_path)?)?;

    let send_timeout = Duration::from_secs(config.dispatch.send_timeout_secs);
    let engine = match remind_telegram::TelegramNotifier::new(
        config.telegram.bot_token.as_deref(),
        send_timeout,
    ) {
        Ok(notifier) => {
            let engine_store =
                remind_store::ReminderStore::new(rusqlite::Connection::open(&db_path)?)?;
            Some(Arc::new(remind_dispatch::DispatchEngine::new(
                engine_store,
                notifier,
                config.dispatch.batch_limit,
            )))
        }
        Err(remind_telegram::TelegramError::NoToken) => {
            warn!("no Telegram bot token configured; dispatch disabled, CRUD still served");
            None
        }
        Err(e) => return Err(e.into()),
    };

    // spawn the dispatch loop in the background
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    if let Some(engine) = engine.clone() {
        let poll = Duration::from_secs(config.dispatch.poll_secs);
        tokio::spawn(async move { engine.run(poll, shutdown_rx).await });
    }

    let state = Arc::new(app::AppState {
        config,
        store,
        engine,
    });
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("remind gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    // signal the dispatch loop to stop
    let _ = shutdown_tx.send(true);
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("could not create {}: {e}", parent.display());
            }
        }
    }
}
