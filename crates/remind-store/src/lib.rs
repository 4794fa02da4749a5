//! `remind-store` — SQLite persistence for reminders.
//!
//! Owns the `reminders` table: schema migration ([`db::init_db`]) and the
//! [`ReminderStore`] handle exposing owner-scoped CRUD plus the due-row
//! selection and dispatch-side mutations used by the dispatch engine.
//!
//! Every mutating call commits atomically on its own; there are no
//! multi-statement transactions spanning reminders.

pub mod db;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::ReminderStore;
