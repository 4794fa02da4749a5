//! Manual dispatch trigger — GET/POST /dispatch
//!
//! The background loop already polls on its own; this endpoint exists for
//! platform schedulers and manual runs. It executes one pass synchronously
//! and reports `{"sent": n, "checked_at": "..."}`. Per-item delivery
//! failures are excluded from the count (they are logged server-side).

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use remind_core::types::format_ts;

use crate::app::AppState;
use crate::http::{internal, ApiError, ErrorBody};

#[derive(Serialize)]
pub struct DispatchResponse {
    pub sent: u32,
    pub checked_at: String,
}

pub async fn trigger_dispatch(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DispatchResponse>, ApiError> {
    let Some(engine) = state.engine.as_ref() else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "TELEGRAM_BOT_TOKEN not set".to_string(),
            }),
        ));
    };

    let summary = engine.run_pass().await.map_err(internal)?;
    Ok(Json(DispatchResponse {
        sent: summary.sent,
        checked_at: format_ts(summary.checked_at),
    }))
}
