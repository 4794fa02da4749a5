use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use rusqlite::Connection;
use tracing::info;

use remind_core::types::{format_ts, parse_ts, Reminder, Repeat};

use crate::{db::init_db, error::Result, StoreError};

/// Handle over the reminders table.
///
/// Owns its own `Connection` behind a mutex so the HTTP handlers and the
/// dispatch engine can each hold a handle without sharing statements
/// (the same pattern the gateway uses for every subsystem).
pub struct ReminderStore {
    conn: Arc<Mutex<Connection>>,
}

impl ReminderStore {
    /// Wrap `conn`, running the schema migration if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// All reminders for `chat_id`, ascending by due time. An owner with no
    /// history yields an empty vec, not an error.
    pub fn list(&self, chat_id: i64) -> Result<Vec<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, chat_id, text, remind_at, repeat, done, sent
             FROM reminders WHERE chat_id = ?1 ORDER BY remind_at ASC",
        )?;
        let rows = stmt
            .query_map([chat_id], row_to_parts)?
            .filter_map(|r| r.ok())
            .filter_map(parts_to_reminder)
            .collect();
        Ok(rows)
    }

    /// Insert a new reminder and return its id. `done` and `sent` start
    /// false; `repeat` defaults to `once` at the call sites that omit it.
    pub fn create(
        &self,
        chat_id: i64,
        text: &str,
        remind_at: NaiveDateTime,
        repeat: Repeat,
    ) -> Result<i64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::Validation("text must not be empty".into()));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO reminders (chat_id, text, remind_at, repeat, done, sent)
             VALUES (?1, ?2, ?3, ?4, 0, 0)",
            rusqlite::params![chat_id, text, format_ts(remind_at), repeat.to_string()],
        )?;
        let id = conn.last_insert_rowid();
        info!(reminder_id = id, chat_id, %repeat, "reminder created");
        Ok(id)
    }

    /// Set the completion flag on the reminder matching both `id` and
    /// `chat_id`. Affecting zero rows (wrong owner, already deleted) is a
    /// no-op, not an error.
    pub fn set_done(&self, chat_id: i64, id: i64, done: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE reminders SET done = ?1 WHERE id = ?2 AND chat_id = ?3",
            rusqlite::params![done, id, chat_id],
        )?;
        if n > 0 {
            info!(reminder_id = id, chat_id, done, "reminder completion updated");
        }
        Ok(())
    }

    /// Delete the reminder matching both `id` and `chat_id`. Idempotent:
    /// zero rows affected is still success.
    pub fn delete(&self, chat_id: i64, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "DELETE FROM reminders WHERE id = ?1 AND chat_id = ?2",
            rusqlite::params![id, chat_id],
        )?;
        if n > 0 {
            info!(reminder_id = id, chat_id, "reminder deleted");
        }
        Ok(())
    }

    /// Rows eligible for dispatch at `now`: unsent, not done, due. Ordered
    /// ascending by due time and capped at `limit` to bound per-pass work.
    pub fn select_due(&self, now: NaiveDateTime, limit: u32) -> Result<Vec<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, chat_id, text, remind_at, repeat, done, sent
             FROM reminders
             WHERE sent = 0 AND done = 0 AND remind_at <= ?1
             ORDER BY remind_at ASC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(rusqlite::params![format_ts(now), limit], row_to_parts)?
            .filter_map(|r| r.ok())
            .filter_map(parts_to_reminder)
            .collect();
        Ok(rows)
    }

    /// Terminal-mark a `once` reminder. Conditional claim: only flips rows
    /// where `sent` is still false, so overlapping passes cannot both claim
    /// the same occurrence. Returns whether this call won the claim.
    pub fn mark_sent(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE reminders SET sent = 1 WHERE id = ?1 AND sent = 0",
            [id],
        )?;
        Ok(n > 0)
    }

    /// Advance a recurring reminder to its next occurrence, re-arming `sent`.
    pub fn reschedule(&self, id: i64, next: NaiveDateTime) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE reminders SET sent = 0, remind_at = ?1 WHERE id = ?2",
            rusqlite::params![format_ts(next), id],
        )?;
        Ok(())
    }
}

type RowParts = (i64, i64, String, String, String, bool, bool);

fn row_to_parts(row: &rusqlite::Row<'_>) -> rusqlite::Result<RowParts> {
    Ok((
        row.get(0)?, // id
        row.get(1)?, // chat_id
        row.get(2)?, // text
        row.get(3)?, // remind_at
        row.get(4)?, // repeat
        row.get(5)?, // done
        row.get(6)?, // sent
    ))
}

/// Rows with an unparseable timestamp or repeat value are skipped rather
/// than failing the whole query.
fn parts_to_reminder(parts: RowParts) -> Option<Reminder> {
    let (id, chat_id, text, remind_at, repeat, done, sent) = parts;
    Some(Reminder {
        id,
        chat_id,
        text,
        remind_at: parse_ts(&remind_at).ok()?,
        repeat: repeat.parse().ok()?,
        done,
        sent,
    })
}
