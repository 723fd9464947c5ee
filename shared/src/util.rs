/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds in one hour
pub const HOUR_MILLIS: i64 = 60 * 60 * 1000;
