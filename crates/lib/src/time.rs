//! Canonical text form of instants.
//!
//! Instants are written with the shortest form that keeps their precision:
//!
//! - sub-second precision or a non-UTC offset: full RFC 3339 timestamp
//! - any non-zero time of day: `YYYY-MM-DD HH:MM:SS`
//! - otherwise: `YYYY-MM-DD`
//!
//! [`parse_time`] accepts all three forms back.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Timelike};

/// Layout of the date-and-time form.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layout of the date-only form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats an instant using the shortest canonical form.
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use envtree::time::format_time;
/// let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap().fixed_offset();
/// assert_eq!(format_time(&midnight), "2024-03-01");
///
/// let afternoon = Utc.with_ymd_and_hms(2024, 3, 1, 15, 4, 5).unwrap().fixed_offset();
/// assert_eq!(format_time(&afternoon), "2024-03-01 15:04:05");
/// ```
pub fn format_time(time: &DateTime<FixedOffset>) -> String {
    // The short forms carry no offset and are read back as UTC
    if time.nanosecond() != 0 || time.offset().local_minus_utc() != 0 {
        return time.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    }

    if time.hour() != 0 || time.minute() != 0 || time.second() != 0 {
        return time.format(DATE_TIME_FORMAT).to_string();
    }

    time.format(DATE_FORMAT).to_string()
}

/// Parses any of the canonical forms. Forms without an offset are read as UTC.
pub fn parse_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time);
    }

    if let Ok(time) = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT) {
        return Some(time.and_utc().fixed_offset());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc().fixed_offset())
}
