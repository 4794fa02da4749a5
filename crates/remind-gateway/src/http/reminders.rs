//! CRUD surface for reminders — GET/POST/PUT/DELETE /reminders
//!
//! All operations are scoped by the `chat_id` query parameter. Validation
//! happens here; malformed identity or body fields never reach the store.
//! Ownership-scoped updates and deletes that match zero rows still answer
//! `{"ok": true}` — they are idempotent no-ops, not errors.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use remind_core::types::{format_ts, parse_ts, Reminder, Repeat};

use crate::app::AppState;
use crate::http::{bad_request, store_error, ApiError, ErrorBody};

#[derive(Deserialize)]
pub struct ReminderQuery {
    pub chat_id: Option<String>,
    pub id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub text: String,
    pub remind_at: Option<String>,
    pub repeat: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub id: Option<i64>,
    /// Defaults to true: a bare `{"id": n}` marks the reminder completed.
    pub done: Option<bool>,
}

#[derive(Serialize)]
pub struct ReminderResponse {
    pub id: i64,
    pub text: String,
    pub remind_at: String,
    pub repeat: Repeat,
    pub done: bool,
    pub sent: bool,
}

impl From<Reminder> for ReminderResponse {
    fn from(r: Reminder) -> Self {
        Self {
            id: r.id,
            text: r.text,
            remind_at: format_ts(r.remind_at),
            repeat: r.repeat,
            done: r.done,
            sent: r.sent,
        }
    }
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// GET /reminders?chat_id= — all reminders for the owner, soonest first.
pub async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReminderQuery>,
) -> Result<Json<Vec<ReminderResponse>>, ApiError> {
    let chat_id = require_chat_id(&query)?;
    let rows = state.store.list(chat_id).map_err(store_error)?;
    Ok(Json(rows.into_iter().map(ReminderResponse::from).collect()))
}

/// POST /reminders?chat_id= — create a reminder, answering `{"id": n}`.
pub async fn create_reminder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReminderQuery>,
    Json(body): Json<CreateRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let chat_id = require_chat_id(&query)?;

    let text = body.text.trim();
    let remind_at = match body.remind_at.as_deref() {
        Some(raw) if !text.is_empty() => {
            parse_ts(raw).map_err(|e| bad_request(e.to_string()))?
        }
        _ => return Err(bad_request("text and remind_at required")),
    };
    let repeat = match body.repeat.as_deref() {
        Some(raw) => raw.parse().map_err(|e: remind_core::CoreError| bad_request(e.to_string()))?,
        None => Repeat::default(),
    };

    let id = state
        .store
        .create(chat_id, text, remind_at, repeat)
        .map_err(store_error)?;
    Ok(Json(CreatedResponse { id }))
}

/// PUT /reminders?chat_id= — set the completion flag (default true).
pub async fn update_reminder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReminderQuery>,
    Json(body): Json<UpdateRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let chat_id = require_chat_id(&query)?;
    let id = body.id.ok_or_else(|| bad_request("id required"))?;

    state
        .store
        .set_done(chat_id, id, body.done.unwrap_or(true))
        .map_err(store_error)?;
    Ok(Json(OkResponse { ok: true }))
}

/// DELETE /reminders?chat_id=&id= — remove a reminder the owner holds.
pub async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReminderQuery>,
) -> Result<Json<OkResponse>, ApiError> {
    let chat_id = require_chat_id(&query)?;
    let id = require_id(&query)?;

    state.store.delete(chat_id, id).map_err(store_error)?;
    Ok(Json(OkResponse { ok: true }))
}

/// OPTIONS /reminders — empty 200; the CORS layer attaches the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any verb without a handler on /reminders.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method not allowed".to_string(),
        }),
    )
}

fn require_chat_id(query: &ReminderQuery) -> Result<i64, ApiError> {
    let raw = query
        .chat_id
        .as_deref()
        .ok_or_else(|| bad_request("chat_id required"))?;
    raw.parse()
        .map_err(|_| bad_request("chat_id must be an integer"))
}

fn require_id(query: &ReminderQuery) -> Result<i64, ApiError> {
    let raw = query
        .id
        .as_deref()
        .ok_or_else(|| bad_request("id required"))?;
    raw.parse().map_err(|_| bad_request("id must be an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(chat_id: Option<&str>, id: Option<&str>) -> ReminderQuery {
        ReminderQuery {
            chat_id: chat_id.map(String::from),
            id: id.map(String::from),
        }
    }

    #[test]
    fn chat_id_is_required_and_integer() {
        assert!(require_chat_id(&query(None, None)).is_err());
        assert!(require_chat_id(&query(Some("abc"), None)).is_err());
        assert_eq!(require_chat_id(&query(Some("42"), None)).unwrap(), 42);
        assert_eq!(require_chat_id(&query(Some("-7"), None)).unwrap(), -7);
    }

    #[test]
    fn delete_id_is_required_and_integer() {
        assert!(require_id(&query(Some("1"), None)).is_err());
        assert!(require_id(&query(Some("1"), Some("x"))).is_err());
        assert_eq!(require_id(&query(Some("1"), Some("9"))).unwrap(), 9);
    }
}
