//! Timestamp conversion utilities.
//!
//! Header timestamps are nanoseconds since the Unix epoch, always UTC. This
//! module converts them to [`SystemTime`] and to/from RFC 3339 strings.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

const NANOSECONDS_PER_SECOND: u64 = 1_000_000_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Error type for RFC 3339 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Converts a header timestamp to a clock value.
pub fn to_time(timestamp: u64) -> SystemTime {
    let secs = timestamp / NANOSECONDS_PER_SECOND;
    let nanos = (timestamp % NANOSECONDS_PER_SECOND) as u32;
    UNIX_EPOCH + Duration::new(secs, nanos)
}

/// Parses a fixed-width run of ASCII digits. Signs and spaces are rejected.
fn parse_digits<T: std::str::FromStr>(digits: &str) -> Option<T> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i64, DateTimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    let invalid = || DateTimeParseError::new(format!("Invalid timezone offset: {}", offset));

    if offset.len() != 6 || offset.as_bytes()[3] != b':' {
        return Err(invalid());
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1i64,
        b'-' => -1i64,
        _ => return Err(invalid()),
    };

    let hours: i64 = parse_digits(&offset[1..3]).ok_or_else(invalid)?;
    let minutes: i64 = parse_digits(&offset[4..6]).ok_or_else(invalid)?;

    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(invalid());
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Parses fractional seconds (up to 9 digits) and returns nanoseconds.
fn parse_fractional_seconds(frac: &str) -> Result<u64, DateTimeParseError> {
    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeParseError::new(format!(
            "Invalid fractional seconds: {}",
            frac
        )));
    }
    let mut padded = frac.to_string();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded
        .parse()
        .map_err(|_| DateTimeParseError::new(format!("Invalid fractional seconds: {}", frac)))
}

/// Formats nanoseconds as fractional seconds string, omitting if zero.
fn format_fractional_seconds(ns: u64) -> String {
    if ns == 0 {
        return String::new();
    }

    let str = format!("{:09}", ns);
    let trimmed = str.trim_end_matches('0');
    format!(".{}", trimmed)
}

/// Returns true if the given year is a leap year.
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given date.
fn date_to_days(year: i64, month: u32, day: u32) -> i64 {
    // Howard Hinnant's days_from_civil
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month as i64 + 9 } else { month as i64 - 3 };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // year of era
    let doy = (153 * m + 2) / 5 + day as i64 - 1; // day of year
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era

    era * 146097 + doe - 719468
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    // Howard Hinnant's civil_from_days
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;

    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Formats a header timestamp as an RFC 3339 UTC datetime.
///
/// Fractional seconds are printed with trailing zeros trimmed and omitted
/// entirely on whole seconds.
pub fn format_timestamp_rfc3339(timestamp: u64) -> String {
    let secs = timestamp / NANOSECONDS_PER_SECOND;
    let nanos = timestamp % NANOSECONDS_PER_SECOND;

    let (year, month, day) = days_to_date((secs / SECONDS_PER_DAY) as i64);
    let time_of_day = secs % SECONDS_PER_DAY;
    let hours = time_of_day / SECONDS_PER_HOUR;
    let minutes = (time_of_day % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = time_of_day % SECONDS_PER_MINUTE;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}Z",
        year,
        month,
        day,
        hours,
        minutes,
        seconds,
        format_fractional_seconds(nanos)
    )
}

/// Parses an RFC 3339 datetime into a header timestamp.
///
/// Accepts `T` or space as separator, up to nine fractional digits and a
/// `Z` or `+HH:MM`/`-HH:MM` offset. Instants before the Unix epoch or past
/// the `u64` nanosecond range are rejected.
pub fn parse_timestamp_rfc3339(datetime_str: &str) -> Result<u64, DateTimeParseError> {
    let invalid = |what: &str| DateTimeParseError::new(format!("Invalid {} in datetime: {}", what, datetime_str));

    // Minimum length is 20 (YYYY-MM-DDTHH:MM:SSZ)
    if datetime_str.len() < 20 || !datetime_str.is_ascii() {
        return Err(DateTimeParseError::new(format!(
            "Invalid RFC 3339 datetime: {}",
            datetime_str
        )));
    }

    let bytes = datetime_str.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' || !(bytes[10] == b'T' || bytes[10] == b' ') {
        return Err(invalid("date"));
    }
    if bytes[13] != b':' || bytes[16] != b':' {
        return Err(invalid("time"));
    }

    let year: i64 = parse_digits(&datetime_str[..4]).ok_or_else(|| invalid("year"))?;
    let month: u32 = parse_digits(&datetime_str[5..7]).ok_or_else(|| invalid("month"))?;
    let day: u32 = parse_digits(&datetime_str[8..10]).ok_or_else(|| invalid("day"))?;
    let hours: u64 = parse_digits(&datetime_str[11..13]).ok_or_else(|| invalid("hours"))?;
    let minutes: u64 = parse_digits(&datetime_str[14..16]).ok_or_else(|| invalid("minutes"))?;
    let seconds: u64 = parse_digits(&datetime_str[17..19]).ok_or_else(|| invalid("seconds"))?;

    if !(1..=12).contains(&month) {
        return Err(invalid("month"));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(invalid("day"));
    }
    if hours > 23 {
        return Err(invalid("hours"));
    }
    if minutes > 59 {
        return Err(invalid("minutes"));
    }
    if seconds > 59 {
        return Err(invalid("seconds"));
    }

    // Optional fractional seconds, then a mandatory offset
    let rest = &datetime_str[19..];
    let (nanos, offset_str) = match rest.strip_prefix('.') {
        Some(frac_and_tz) => {
            let frac_end = frac_and_tz
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(frac_and_tz.len());
            (
                parse_fractional_seconds(&frac_and_tz[..frac_end])?,
                &frac_and_tz[frac_end..],
            )
        }
        None => (0, rest),
    };
    let offset_min = parse_timezone_offset(offset_str)?;

    let days = date_to_days(year, month, day);
    let local_secs = days * SECONDS_PER_DAY as i64
        + (hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds) as i64;
    // local time = UTC + offset, so UTC = local - offset
    let utc_secs = local_secs - offset_min * SECONDS_PER_MINUTE as i64;

    if utc_secs < 0 {
        return Err(DateTimeParseError::new(format!(
            "Datetime before Unix epoch: {}",
            datetime_str
        )));
    }

    (utc_secs as u64)
        .checked_mul(NANOSECONDS_PER_SECOND)
        .and_then(|ns| ns.checked_add(nanos))
        .ok_or_else(|| DateTimeParseError::new(format!("Datetime out of range: {}", datetime_str)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::MAGIC_DATE;

    #[test]
    fn test_to_time() {
        assert_eq!(to_time(0), UNIX_EPOCH);
        assert_eq!(to_time(1_500_000_000), UNIX_EPOCH + Duration::new(1, 500_000_000));
        assert_eq!(
            to_time(MAGIC_DATE),
            UNIX_EPOCH + Duration::new(1_652_155_382, 1)
        );
        assert_eq!(
            to_time(u64::MAX),
            UNIX_EPOCH + Duration::new(u64::MAX / 1_000_000_000, (u64::MAX % 1_000_000_000) as u32)
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp_rfc3339(0), "1970-01-01T00:00:00Z");
        assert_eq!(
            format_timestamp_rfc3339(1_234_567_890),
            "1970-01-01T00:00:01.23456789Z"
        );
        assert_eq!(
            format_timestamp_rfc3339(MAGIC_DATE),
            "2022-05-10T04:03:02.000000001Z"
        );
        assert_eq!(
            format_timestamp_rfc3339(1_710_513_000_000_000_000),
            "2024-03-15T14:30:00Z"
        );
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp_rfc3339("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(
            parse_timestamp_rfc3339("2022-05-10T04:03:02.000000001Z").unwrap(),
            MAGIC_DATE
        );
        assert_eq!(
            parse_timestamp_rfc3339("2024-03-15 14:30:00.5Z").unwrap(),
            1_710_513_000_500_000_000
        );
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let utc = parse_timestamp_rfc3339("2024-03-15T09:00:00Z").unwrap();
        let local = parse_timestamp_rfc3339("2024-03-15T14:30:00+05:30").unwrap();
        assert_eq!(utc, local);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let datetimes = [
            "1970-01-01T00:00:00Z",
            "2000-02-29T12:00:00.25Z",
            "2022-05-10T04:03:02.000000001Z",
            "2024-12-31T23:59:59.999999999Z",
        ];

        for datetime in datetimes {
            let ts = parse_timestamp_rfc3339(datetime).unwrap();
            assert_eq!(format_timestamp_rfc3339(ts), datetime, "Roundtrip failed for {}", datetime);
        }
    }

    #[test]
    fn test_invalid_datetimes() {
        assert!(parse_timestamp_rfc3339("2024-13-01T00:00:00Z").is_err()); // invalid month
        assert!(parse_timestamp_rfc3339("2023-02-29T00:00:00Z").is_err()); // not a leap year
        assert!(parse_timestamp_rfc3339("2024-03-15T24:00:00Z").is_err()); // invalid hour
        assert!(parse_timestamp_rfc3339("2024-03-15T14:30:00").is_err()); // missing offset
        assert!(parse_timestamp_rfc3339("2024-03-15T14:30:00.1234567890Z").is_err()); // too precise
        assert!(parse_timestamp_rfc3339("1969-12-31T23:59:59Z").is_err()); // before epoch
        assert!(parse_timestamp_rfc3339("not a datetime at all").is_err());
        assert!(parse_timestamp_rfc3339("2024-+1-15T00:00:00Z").is_err()); // signed month
        assert!(parse_timestamp_rfc3339("+024-01-15T00:00:00Z").is_err()); // signed year
        assert!(parse_timestamp_rfc3339("2024-01-15T00:00:00+-1:00").is_err()); // signed offset hours
    }

    #[test]
    fn test_timezone_offset_edge_cases() {
        assert_eq!(parse_timezone_offset("+24:00"), Ok(1440));
        assert_eq!(parse_timezone_offset("-05:30"), Ok(-330));
        assert!(parse_timezone_offset("+24:01").is_err());
        assert!(parse_timezone_offset("05:00").is_err());
        assert!(parse_timezone_offset("+-1:00").is_err());
        assert!(parse_timezone_offset("+01:+5").is_err());
    }
}
