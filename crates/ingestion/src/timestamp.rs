//! Timestamp parsing for exchange CSV exports.
//!
//! Depth and trade exports stamp records in exchange-local wall time, often
//! with an explicit offset. The offset is only used to read the local time;
//! the stored value is that wall time encoded as UTC milliseconds.

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use recon_core::TimestampMs;

/// Offset-free layouts tried in order after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%b-%Y %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying an offset but not valid RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a raw `Date-Time` cell. Returns `None` when no layout matches.
pub fn parse_timestamp(raw: &str) -> Option<TimestampMs> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(wall_clock_ms(dt.naive_local()));
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(wall_clock_ms(dt.naive_local()));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(wall_clock_ms)
}

#[inline]
fn wall_clock_ms(dt: NaiveDateTime) -> TimestampMs {
    dt.and_utc().timestamp_millis()
}

/// Wall-clock time of day of a timestamp.
pub fn time_of_day(ts_ms: TimestampMs) -> Option<NaiveTime> {
    DateTime::from_timestamp_millis(ts_ms).map(|dt| dt.naive_utc().time())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-15 10:00:00 wall clock
    const OPEN_MS: i64 = 1_736_935_200_000;

    #[test]
    fn test_naive_layouts() {
        assert_eq!(parse_timestamp("2025-01-15 10:00:00"), Some(OPEN_MS));
        assert_eq!(parse_timestamp("2025-01-15T10:00:00.250"), Some(OPEN_MS + 250));
        assert_eq!(parse_timestamp("15-Jan-2025 10:00:01"), Some(OPEN_MS + 1_000));
    }

    #[test]
    fn test_offset_keeps_wall_clock() {
        // The +11:00 offset must not shift the bucket alignment.
        assert_eq!(
            parse_timestamp("2025-01-15T10:00:00.000000000+11:00"),
            Some(OPEN_MS)
        );
        assert_eq!(parse_timestamp("2025-01-15 10:00:00+11:00"), Some(OPEN_MS));
        assert_eq!(parse_timestamp("2025-01-15T10:00:00Z"), Some(OPEN_MS));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a time"), None);
        assert_eq!(parse_timestamp("2025-13-45 99:00:00"), None);
    }

    #[test]
    fn test_time_of_day() {
        let ts = OPEN_MS + 90_500;
        assert_eq!(time_of_day(ts), NaiveTime::from_hms_milli_opt(10, 1, 30, 500));
    }
}
