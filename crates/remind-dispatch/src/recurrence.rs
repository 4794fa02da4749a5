use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use remind_core::types::Repeat;

/// Compute the next occurrence for a reminder that just fired at `remind_at`.
///
/// Pure and deterministic. For `Once` the input is returned unchanged; the
/// engine never reschedules a `once` reminder, so that branch is only
/// reached defensively.
///
/// Monthly rule: the month advances by one (December rolls the year), and
/// the day-of-month is clamped to the last valid day of the target month —
/// Jan 31 goes to Feb 29 in a leap year, Mar 31 to Apr 30. The time of day
/// is preserved. Note the day stays clamped on later occurrences
/// (Jan 31 → Feb 28 → Mar 28).
pub fn next_occurrence(remind_at: NaiveDateTime, repeat: Repeat) -> NaiveDateTime {
    match repeat {
        Repeat::Once => remind_at,
        Repeat::Daily => remind_at + Duration::days(1),
        Repeat::Weekly => remind_at + Duration::days(7),
        Repeat::Monthly => {
            let (year, month) = if remind_at.month() == 12 {
                (remind_at.year() + 1, 1)
            } else {
                (remind_at.year(), remind_at.month() + 1)
            };
            let day = remind_at.day().min(days_in_month(year, month));
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|d| d.and_time(remind_at.time()))
                // Unreachable with a clamped day; keep the old value rather than panic.
                .unwrap_or(remind_at)
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        remind_core::types::parse_ts(s).unwrap()
    }

    #[test]
    fn once_is_unchanged() {
        let at = ts("2024-01-15T10:00:00");
        assert_eq!(next_occurrence(at, Repeat::Once), at);
    }

    #[test]
    fn daily_adds_one_day() {
        assert_eq!(
            next_occurrence(ts("2024-01-15T10:00:00"), Repeat::Daily),
            ts("2024-01-16T10:00:00")
        );
    }

    #[test]
    fn weekly_adds_seven_days() {
        assert_eq!(
            next_occurrence(ts("2024-01-15T10:00:00"), Repeat::Weekly),
            ts("2024-01-22T10:00:00")
        );
    }

    #[test]
    fn monthly_same_day_when_it_exists() {
        assert_eq!(
            next_occurrence(ts("2024-01-15T10:00:00"), Repeat::Monthly),
            ts("2024-02-15T10:00:00")
        );
    }

    #[test]
    fn monthly_clamps_to_leap_february() {
        assert_eq!(
            next_occurrence(ts("2024-01-31T10:00:00"), Repeat::Monthly),
            ts("2024-02-29T10:00:00")
        );
    }

    #[test]
    fn monthly_clamps_to_common_february() {
        assert_eq!(
            next_occurrence(ts("2025-01-31T10:00:00"), Repeat::Monthly),
            ts("2025-02-28T10:00:00")
        );
    }

    #[test]
    fn monthly_clamps_to_thirty_day_month() {
        assert_eq!(
            next_occurrence(ts("2024-03-31T10:00:00"), Repeat::Monthly),
            ts("2024-04-30T10:00:00")
        );
    }

    #[test]
    fn monthly_rolls_over_december() {
        assert_eq!(
            next_occurrence(ts("2024-12-20T08:30:00"), Repeat::Monthly),
            ts("2025-01-20T08:30:00")
        );
    }

    #[test]
    fn recurring_result_is_strictly_later() {
        let at = ts("2024-01-31T10:00:00");
        for repeat in [Repeat::Daily, Repeat::Weekly, Repeat::Monthly] {
            assert!(next_occurrence(at, repeat) > at, "{repeat} did not advance");
        }
    }
}
