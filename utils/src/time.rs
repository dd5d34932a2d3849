//! Display-time formatting for signing times.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a claimed signing time as `yyyy-mm-dd HH:mm` in local time.
///
/// Never fails: input that cannot be parsed is returned unchanged.
pub fn format_signing_time(raw: &str) -> String {
    format_signing_time_in(raw, &Local)
}

/// Same as [`format_signing_time`], rendering in `tz`.
///
/// Accepts RFC 3339 (`2024-03-01T10:15:00Z`, with or without fractional
/// seconds) and offset-less ISO date-times, which are read as `tz` wall-clock
/// time.
pub fn format_signing_time_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.with_timezone(tz).format(DISPLAY_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            if let Some(local) = tz.from_local_datetime(&naive).earliest() {
                return local.format(DISPLAY_FORMAT).to_string();
            }
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_rfc3339_in_utc() {
        assert_eq!(
            format_signing_time_in("2024-03-01T10:15:42Z", &Utc),
            "2024-03-01 10:15"
        );
    }

    #[test]
    fn converts_to_target_offset() {
        let riga = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_signing_time_in("2024-12-31T23:30:00Z", &riga),
            "2025-01-01 01:30"
        );
    }

    #[test]
    fn accepts_fractional_seconds_and_offsetless_input() {
        assert_eq!(
            format_signing_time_in("2024-03-01T10:15:42.123+00:00", &Utc),
            "2024-03-01 10:15"
        );
        assert_eq!(
            format_signing_time_in("2024-03-01T10:15:42", &Utc),
            "2024-03-01 10:15"
        );
    }

    #[test]
    fn unparseable_input_is_returned_verbatim() {
        assert_eq!(format_signing_time_in("yesterday", &Utc), "yesterday");
        assert_eq!(format_signing_time_in("", &Utc), "");
    }
}
