//! Reminder record and recurrence policy — shared between the store, the
//! dispatch engine, and the HTTP gateway.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Timestamps are naive UTC, stored as fixed-width ISO-8601 text so that
/// lexicographic comparison in SQL matches chronological order.
pub const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// How a reminder repeats after a successful dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    /// Fire once; `sent` stays true afterwards.
    #[default]
    Once,
    /// Advance `remind_at` by one day after each dispatch.
    Daily,
    /// Advance `remind_at` by seven days after each dispatch.
    Weekly,
    /// Advance to the same day-of-month one month later, clamped to the
    /// last valid day of the target month.
    Monthly,
}

impl std::fmt::Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Repeat::Once => "once",
            Repeat::Daily => "daily",
            Repeat::Weekly => "weekly",
            Repeat::Monthly => "monthly",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Repeat {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "once" => Ok(Repeat::Once),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            other => Err(CoreError::InvalidRepeat(other.to_string())),
        }
    }
}

/// A persisted reminder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// SQLite rowid — assigned on insert, never reused.
    pub id: i64,
    /// Opaque owner identity; every operation is scoped to it.
    pub chat_id: i64,
    /// Non-empty message body.
    pub text: String,
    /// Naive UTC due time of the current occurrence.
    pub remind_at: NaiveDateTime,
    /// Recurrence policy.
    pub repeat: Repeat,
    /// User completion flag; suppresses dispatch regardless of `sent`.
    pub done: bool,
    /// Dispatcher delivery flag for the current occurrence.
    pub sent: bool,
}

impl Reminder {
    /// Dispatch eligibility: not sent, not done, and due at `now`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        !self.sent && !self.done && self.remind_at <= now
    }
}

/// Format a timestamp in the canonical storage/API shape.
pub fn format_ts(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Parse a client- or store-supplied timestamp.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS` (the storage shape) and `YYYY-MM-DDTHH:MM`
/// (what an HTML `datetime-local` input submits).
pub fn parse_ts(s: &str) -> std::result::Result<NaiveDateTime, CoreError> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| CoreError::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_round_trips_through_str() {
        for r in [Repeat::Once, Repeat::Daily, Repeat::Weekly, Repeat::Monthly] {
            assert_eq!(r.to_string().parse::<Repeat>().unwrap(), r);
        }
    }

    #[test]
    fn repeat_rejects_unknown() {
        assert!("hourly".parse::<Repeat>().is_err());
    }

    #[test]
    fn parse_ts_accepts_minute_precision() {
        let ts = parse_ts("2024-01-15T10:00").unwrap();
        assert_eq!(format_ts(ts), "2024-01-15T10:00:00");
    }

    #[test]
    fn parse_ts_round_trips_seconds() {
        let ts = parse_ts("2024-01-15T10:00:30").unwrap();
        assert_eq!(format_ts(ts), "2024-01-15T10:00:30");
    }

    #[test]
    fn parse_ts_rejects_garbage() {
        assert!(parse_ts("tomorrow at noon").is_err());
        assert!(parse_ts("").is_err());
    }

    #[test]
    fn due_requires_unsent_undone_and_elapsed() {
        let now = parse_ts("2024-01-15T10:00:00").unwrap();
        let base = Reminder {
            id: 1,
            chat_id: 7,
            text: "water the plants".into(),
            remind_at: parse_ts("2024-01-15T09:00:00").unwrap(),
            repeat: Repeat::Once,
            done: false,
            sent: false,
        };
        assert!(base.is_due(now));
        assert!(!Reminder { sent: true, ..base.clone() }.is_due(now));
        assert!(!Reminder { done: true, ..base.clone() }.is_due(now));
        assert!(!Reminder {
            remind_at: parse_ts("2024-01-15T11:00:00").unwrap(),
            ..base
        }
        .is_due(now));
    }
}
