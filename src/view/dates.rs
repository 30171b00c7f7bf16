//! Record date parsing.
//!
//! Backends send plain ISO days (`2024-01-05`), RFC 3339 timestamps
//! (`2024-01-05T14:30:00Z`) or naive timestamps (`2024-01-05T14:30`,
//! `2024-01-05 14:30:00`). Anything else is unreadable and yields `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a record date string down to a calendar day.
#[must_use]
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    parse_record_timestamp(raw).map(|ts| ts.date())
}

/// Parses a record date string into a timestamp. Plain days map to
/// midnight; offsets are dropped after converting to the local wall time
/// they were written in.
#[must_use]
pub fn parse_record_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day.and_time(NaiveTime::MIN));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
