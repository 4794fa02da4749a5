use rusqlite::Connection;

use crate::error::Result;

/// Initialise the reminders schema in `conn`. Safe to call on every startup
/// (idempotent).
///
/// The `(sent, done, remind_at)` index covers the dispatcher's due-row poll;
/// the `chat_id` index covers the owner-scoped CRUD queries.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reminders (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id     INTEGER NOT NULL,
            text        TEXT    NOT NULL,
            remind_at   TEXT    NOT NULL,   -- naive UTC, %Y-%m-%dT%H:%M:%S
            repeat      TEXT    NOT NULL DEFAULT 'once',
            done        INTEGER NOT NULL DEFAULT 0,
            sent        INTEGER NOT NULL DEFAULT 0
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_reminders_chat
            ON reminders (chat_id, remind_at);
        CREATE INDEX IF NOT EXISTS idx_reminders_due
            ON reminders (sent, done, remind_at);
        ",
    )?;
    Ok(())
}
