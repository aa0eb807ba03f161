use chrono::{DateTime, Local, Utc};

const DISPLAY_FORMAT: &str = "%d-%m-%Y %-I:%M:%S";

/// Exchange timestamp in the operator's local time, `DD-MM-YYYY h:mm:ss`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

pub fn now_stamp() -> String {
    format_timestamp(Utc::now())
}

/// Milliseconds since the epoch, as the exchange expects in signed requests.
pub fn current_unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Exchange millisecond timestamp; out-of-range values collapse to the epoch.
pub fn from_unix_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
