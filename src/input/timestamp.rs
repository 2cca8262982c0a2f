//! Story export timestamp repair
//!
//! Story exports write `Publish time` as US-Eastern wall clock time in a
//! handful of formats. These are rewritten as UTC instants
//! (`2025-05-29T21:04:00.000Z`) so they sort and compare with API rows.

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

/// Wall clock formats tried in order; two-digit years must precede four-digit ones
const LOCAL_FORMATS: [&str; 10] = [
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// `%Y` also accepts short years; anything earlier is a misread
const MIN_YEAR: i32 = 1000;

/// Formats carrying their own UTC offset
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Timezone story exports are written in
pub const EXPORT_TZ: Tz = New_York;

/// Rewrite a story `Publish time` as a UTC ISO-8601 string
///
/// Returns an empty string for blank or unparseable input; the raw value is
/// never passed through.
pub fn normalize_publish_time(raw: &str) -> String {
    parse_publish_time(raw)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Parse a story `Publish time`, assuming US-Eastern when no offset is given
pub fn parse_publish_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    LOCAL_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .find(|dt| dt.year() >= MIN_YEAR)
        .and_then(eastern_to_utc)
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| parse_iso_fallback(raw))
}

/// Generic ISO-8601 parse: RFC 3339 keeps its offset, bare forms are Eastern
fn parse_iso_fallback(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .filter(|dt| dt.year() >= MIN_YEAR)
        .and_then(eastern_to_utc)
}

/// Resolve Eastern wall clock time to UTC
///
/// Ambiguous fall-back times take the earlier (EDT) instant. Times inside the
/// spring-forward gap are moved forward one hour.
fn eastern_to_utc(local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let resolved = match EXPORT_TZ.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => EXPORT_TZ
            .from_local_datetime(&(local + chrono::Duration::hours(1)))
            .earliest(),
    };
    resolved.map(|dt| dt.with_timezone(&Utc))
}
