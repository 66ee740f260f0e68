//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml::Value;

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        // Try parsing date only
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // Try RFC 3339 / ISO 8601 with an offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

/// Parse a metadata value as a date; only string values are recognized
pub fn parse_date_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_string(s),
        _ => None,
    }
}

/// Format a date for listings
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let dt = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 10:30:00");
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn test_parse_slash_format() {
        assert!(parse_date_string("2024/01/15 10:30").is_some());
        assert!(parse_date_string("2024/01/15").is_some());
    }

    #[test]
    fn test_parse_rfc3339() {
        assert!(parse_date_string("2024-01-15T10:30:00+02:00").is_some());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_date_string("yesterday").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_parse_value_rejects_non_strings() {
        assert!(parse_date_value(&Value::String("2024-01-15".into())).is_some());
        assert!(parse_date_value(&Value::Number(2024.into())).is_none());
        assert!(parse_date_value(&Value::Null).is_none());
    }

    #[test]
    fn test_format_date() {
        let dt = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(format_date(&dt), "2024-01-15");
    }
}
