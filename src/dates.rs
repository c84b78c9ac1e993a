// src/dates.rs
//! Timestamp parsing at the retrieval boundary and relative/absolute labels
//! for rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Label used for absent or unparsable dates.
pub const NO_DATE: &str = "N/A";

/// Parse the date shapes providers emit. Naive forms are read as UTC.
///
/// Accepted: RFC 3339, RFC 2822 (RSS `pubDate`), `YYYY-MM-DDTHH:MM:SS[.f][%z]`,
/// `YYYY-MM-DD HH:MM:SS[.f]` and bare `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Human label for a record date relative to `now`.
///
/// Under 24h: `"<N> hours ago"` (floor). Under 48h: `"Yesterday"`.
/// Otherwise `"Jan 5, 2024"` in `now`'s time zone. Dates ahead of `now`
/// count as zero elapsed hours.
pub fn format_date<Tz>(date: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(date) = date else {
        return NO_DATE.to_string();
    };

    let elapsed_ms = now
        .clone()
        .with_timezone(&Utc)
        .signed_duration_since(*date)
        .num_milliseconds()
        .max(0);

    if elapsed_ms < 24 * HOUR_MS {
        format!("{} hours ago", elapsed_ms / HOUR_MS)
    } else if elapsed_ms < 48 * HOUR_MS {
        "Yesterday".to_string()
    } else {
        date.with_timezone(&now.timezone())
            .format("%b %-d, %Y")
            .to_string()
    }
}
