//! Business time zone helpers
//!
//! The time zone is always passed in explicitly; nothing here reads or
//! mutates process-wide state. The db layer only sees `i64` Unix millis
//! and `NaiveDate` business dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

fn to_local(millis: i64, tz: Tz) -> DateTime<Tz> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&tz)
}

fn local_naive_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    // DST gap: the local time does not exist, fall back to UTC.
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Calendar date of `millis` in the business time zone
pub fn business_date(millis: i64, tz: Tz) -> NaiveDate {
    to_local(millis, tz).date_naive()
}

/// `[start, end)` Unix millis covering `date` in the business time zone
pub fn day_bounds_millis(date: NaiveDate, tz: Tz) -> (i64, i64) {
    let next_day = date.succ_opt().unwrap_or(date);
    (
        local_naive_to_millis(date.and_time(NaiveTime::MIN), tz),
        local_naive_to_millis(next_day.and_time(NaiveTime::MIN), tz),
    )
}

/// `YYYY-MM-DD HH:MM:SS` wall-clock string, the format the check-in
/// service compares `last_reset_datetime` against
pub fn format_local(millis: i64, tz: Tz) -> String {
    to_local(millis, tz).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse a `HH:MM` reset time, falling back to midnight
pub fn parse_reset_time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to parse reset_time '{}': {}, falling back to 00:00",
                value,
                e
            );
            NaiveTime::MIN
        })
}

/// Time left until the next occurrence of `at` (local wall clock) after `now`
pub fn duration_until_next(now_millis: i64, at: NaiveTime, tz: Tz) -> std::time::Duration {
    let now = to_local(now_millis, tz);
    let today = now.date_naive();

    let target_date = if now.time() >= at {
        today.succ_opt().unwrap_or(today)
    } else {
        today
    };

    let target = local_naive_to_millis(target_date.and_time(at), tz);
    let millis = target - now_millis;
    if millis <= 0 {
        std::time::Duration::from_secs(60)
    } else {
        std::time::Duration::from_millis(millis as u64)
    }
}
