//! Date parsing for ledger rows and operator input, plus local report timestamps.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a ledger date cell. Spreadsheet exports often carry a midnight
/// time part; it is dropped.
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Parse an operator-supplied `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse().map_err(|_| anyhow!("invalid timezone: {tz}"))
}

/// Format a UTC instant as local wall time in an IANA timezone.
pub fn format_local(dt: DateTime<Utc>, tz: &str) -> Result<String> {
    let tz = parse_timezone(tz)?;
    Ok(dt.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_record_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(parse_record_date("2024-03-07"), Some(expected));
        assert_eq!(parse_record_date(" 2024-03-07 "), Some(expected));
        assert_eq!(parse_record_date("2024-03-07 00:00:00"), Some(expected));
        assert_eq!(parse_record_date("2024-03-07T18:30:00"), Some(expected));
        assert_eq!(parse_record_date("2024/03/07"), Some(expected));
        assert_eq!(parse_record_date("03/07/2024"), Some(expected));
        assert_eq!(parse_record_date("March 7"), None);
        assert_eq!(parse_record_date(""), None);
    }

    #[test]
    fn test_parse_iso_date_strict() {
        assert!(parse_iso_date("2024-01-31").is_ok());
        assert!(parse_iso_date("2024-02-30").is_err());
        assert!(parse_iso_date("01/31/2024").is_err());
    }

    #[test]
    fn test_format_local_caracas() {
        // Caracas is UTC-4 year round
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 16, 45, 0).unwrap();
        let s = format_local(utc, "America/Caracas").unwrap();
        assert!(s.starts_with("2024-01-15 12:45"), "got {s}");
        assert!(format_local(utc, "Mars/Olympus").is_err());
    }
}
