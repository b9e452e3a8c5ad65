use chrono::{DateTime, SecondsFormat, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days elapsed from `then` to `now`, floored.
///
/// Instants less than 24h apart yield 0 regardless of calendar dates; an
/// instant slightly in the future yields -1.
pub fn elapsed_days(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub fn exceeds(days: i64, threshold: i64) -> bool {
    days > threshold
}

pub fn format_last_used(last_used: Option<DateTime<Utc>>) -> String {
    match last_used {
        Some(t) => t.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => "Never".to_string(),
    }
}
