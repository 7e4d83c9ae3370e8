//! Date/text conversion helpers.
//!
//! The upstream data carries timezone-naive local timestamps and the store
//! keeps them as ISO-8601 text, so lexicographic comparison in SQL is
//! chronological comparison. These helpers are the single place the format
//! string lives.

use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Storage format for every date column.
pub const STORE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a timestamp for storage.
pub fn to_store(ts: NaiveDateTime) -> String {
    ts.format(STORE_FORMAT).to_string()
}

/// Parse a stored timestamp back.
pub fn from_store(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, STORE_FORMAT)
}

/// Midnight at the start of the day before `report_date`.
///
/// The lower bound for today-vs-yesterday queries: records on or after
/// this instant span exactly the last two report days.
pub fn yesterday_midnight(report_date: NaiveDateTime) -> NaiveDateTime {
    (report_date.date() - Duration::days(1)).and_time(NaiveTime::MIN)
}
