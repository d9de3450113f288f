//! Time and duration helpers for provider data.
//!
//! The provider sends ISO 8601 timestamps (offsets written either as
//! `+01:00` or `+0100`) and durations as `"00d01:23:45"`. Anything that
//! fails to parse is reported as `None`; callers decide the fallback.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Europe::Zurich;
use chrono_tz::Tz;

/// Parse a provider duration string into whole minutes.
///
/// Accepts `HH:MM:SS` with an optional day prefix (`1d`, `01D`).
/// Seconds are validated but ignored.
///
/// # Examples
///
/// ```
/// use transit_server::domain::time::parse_duration;
///
/// assert_eq!(parse_duration("01:02:03"), Some(62));
/// assert_eq!(parse_duration("1d02:00:00"), Some(1560));
/// assert_eq!(parse_duration("00d00:45:00"), Some(45));
/// assert_eq!(parse_duration("soon"), None);
/// ```
pub fn parse_duration(s: &str) -> Option<u32> {
    let s = s.trim();
    let (days, clock) = match s.find(['d', 'D']) {
        Some(idx) => (parse_digits(&s[..idx])?, &s[idx + 1..]),
        None => (0, s),
    };

    let mut parts = clock.split(':');
    let hours = parse_digits(parts.next()?)?;
    let minutes = parse_digits(parts.next()?)?;
    parse_digits(parts.next()?)?;
    if parts.next().is_some() || minutes > 59 {
        return None;
    }

    days.checked_mul(24 * 60)?
        .checked_add(hours.checked_mul(60)?)?
        .checked_add(minutes)
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse an ISO 8601 timestamp.
///
/// Timestamps without an offset are interpreted as Swiss local time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt);
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()?;
    Zurich
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

/// Convert a timestamp to Swiss local time.
pub fn to_swiss_local(dt: &DateTime<FixedOffset>) -> DateTime<Tz> {
    dt.with_timezone(&Zurich)
}

/// Minutes from `from` to `to`, rounded to the nearest minute.
///
/// Returns `None` if either timestamp is missing or unparseable.
pub fn minutes_between(from: &str, to: &str) -> Option<i64> {
    let from = parse_timestamp(from)?;
    let to = parse_timestamp(to)?;
    let millis = (to - from).num_milliseconds();
    Some((millis as f64 / 60_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn duration_without_days() {
        assert_eq!(parse_duration("01:02:03"), Some(62));
        assert_eq!(parse_duration("00:00:59"), Some(0));
    }

    #[test]
    fn duration_with_days() {
        assert_eq!(parse_duration("1d02:00:00"), Some(1560));
        assert_eq!(parse_duration("00d01:23:45"), Some(83));
        assert_eq!(parse_duration("2D00:10:00"), Some(2890));
    }

    #[test]
    fn duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("01:02"), None);
        assert_eq!(parse_duration("01:02:03:04"), None);
        assert_eq!(parse_duration("xd01:02:03"), None);
        assert_eq!(parse_duration("01:75:00"), None);
        assert_eq!(parse_duration("-1:00:00"), None);
    }

    #[test]
    fn duration_overflow_is_none() {
        assert_eq!(parse_duration("99999999:00:00"), None);
        assert_eq!(parse_duration("4000000d00:00:00"), None);
        assert_eq!(parse_duration("2982616d00:00:00"), Some(2982616 * 1440));
        assert_eq!(parse_duration("2982616d23:59:00"), None);
    }

    #[test]
    fn timestamp_with_compact_offset() {
        let dt = parse_timestamp("2024-03-13T08:00:00+0100").unwrap();
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn timestamp_rfc3339() {
        let dt = parse_timestamp("2024-03-13T08:00:00+01:00").unwrap();
        assert_eq!(dt.minute(), 0);
        assert!(parse_timestamp("2024-03-13T07:00:00Z").is_some());
    }

    #[test]
    fn naive_timestamp_is_swiss_local() {
        let dt = parse_timestamp("2024-07-10T08:15").unwrap();
        // Summer time
        assert_eq!(dt.offset().local_minus_utc(), 7200);
        assert_eq!(to_swiss_local(&dt).hour(), 8);
        assert_eq!(to_swiss_local(&dt).day(), 10);
    }

    #[test]
    fn empty_timestamp_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("tomorrow").is_none());
    }

    #[test]
    fn minutes_between_rounds() {
        assert_eq!(
            minutes_between("2024-03-13T08:40:00+0100", "2024-03-13T08:46:00+0100"),
            Some(6)
        );
        assert_eq!(
            minutes_between("2024-03-13T08:40:00+0100", "2024-03-13T08:40:40+0100"),
            Some(1)
        );
        assert_eq!(
            minutes_between("2024-03-13T08:46:00+0100", "2024-03-13T08:40:00+0100"),
            Some(-6)
        );
        assert_eq!(minutes_between("", "2024-03-13T08:40:00+0100"), None);
    }
}
