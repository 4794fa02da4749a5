//! `remind-core` — shared types, configuration, and errors.
//!
//! Everything that more than one subsystem crate needs lives here: the
//! [`types::Reminder`] record and its [`types::Repeat`] policy, the
//! fixed-width timestamp helpers used for SQLite round-tripping, and the
//! figment-backed [`config::RemindConfig`].

pub mod config;
pub mod error;
pub mod types;

pub use config::RemindConfig;
pub use error::{CoreError, Result};
pub use types::{format_ts, parse_ts, Reminder, Repeat};
