use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use remind_core::RemindConfig;
use remind_dispatch::DispatchEngine;
use remind_store::ReminderStore;
use remind_telegram::TelegramNotifier;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: RemindConfig,
    /// Store handle used by the CRUD handlers (the engine holds its own).
    pub store: ReminderStore,
    /// Absent when no bot token is configured; the trigger endpoint then
    /// answers 500 and the background loop is not running.
    pub engine: Option<Arc<DispatchEngine<TelegramNotifier>>>,
}

/// Assemble the full Axum router.
///
/// The permissive CORS layer implements the cross-origin contract: every
/// response carries `Access-Control-Allow-Origin: *` and preflights are
/// answered automatically.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/reminders",
            get(crate::http::reminders::list_reminders)
                .post(crate::http::reminders::create_reminder)
                .put(crate::http::reminders::update_reminder)
                .delete(crate::http::reminders::delete_reminder)
                .options(crate::http::reminders::preflight)
                .fallback(crate::http::reminders::method_not_allowed),
        )
        .route(
            "/dispatch",
            get(crate::http::dispatch::trigger_dispatch)
                .post(crate::http::dispatch::trigger_dispatch),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
