//! `remind-dispatch` — the due-reminder dispatch loop.
//!
//! # Overview
//!
//! [`engine::DispatchEngine`] runs bounded batch passes: it captures `now`
//! once, selects up to `batch_limit` due reminders, and processes each one
//! independently — deliver via the [`notify::Notifier`] seam, then either
//! terminal-mark a `once` reminder or advance a recurring one via
//! [`recurrence::next_occurrence`]. A delivery failure never aborts the
//! batch; the reminder simply stays due for the next pass.
//!
//! # Recurrence
//!
//! | Policy    | Next occurrence                                         |
//! |-----------|---------------------------------------------------------|
//! | `once`    | unchanged (never rescheduled)                           |
//! | `daily`   | +1 day                                                  |
//! | `weekly`  | +7 days                                                 |
//! | `monthly` | month +1, day clamped to the target month's last day    |

pub mod engine;
pub mod error;
pub mod notify;
pub mod recurrence;
pub mod render;

pub use engine::{DispatchEngine, DispatchSummary};
pub use error::{DispatchError, Result};
pub use notify::{Notifier, NotifyError};
pub use recurrence::next_occurrence;
