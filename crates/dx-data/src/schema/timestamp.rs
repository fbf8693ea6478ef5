//! Timestamp recognition

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried in order after RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, read as midnight
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Parse a string as a timestamp
///
/// Offsets are normalised to UTC. Returns `None` for anything that does
/// not match a known layout.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    // Bare numbers are never dates
    if value.is_empty() || value.parse::<f64>().is_ok() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn test_common_layouts() {
        assert_eq!(parse_timestamp("2024-01-05"), Some(ymd_hms(2024, 1, 5, 0, 0, 0)));
        assert_eq!(parse_timestamp("2024-01-05 13:45:10"), Some(ymd_hms(2024, 1, 5, 13, 45, 10)));
        assert_eq!(parse_timestamp("2024-01-05T13:45"), Some(ymd_hms(2024, 1, 5, 13, 45, 0)));
        assert_eq!(parse_timestamp("01/31/2023"), Some(ymd_hms(2023, 1, 31, 0, 0, 0)));
        assert_eq!(parse_timestamp("5-Mar-2022"), Some(ymd_hms(2022, 3, 5, 0, 0, 0)));
        assert_eq!(parse_timestamp("March 5, 2022"), Some(ymd_hms(2022, 3, 5, 0, 0, 0)));
    }

    #[test]
    fn test_full_month_names() {
        assert_eq!(parse_timestamp("September 9, 2022"), Some(ymd_hms(2022, 9, 9, 0, 0, 0)));
        assert_eq!(parse_timestamp("September 9 2022"), Some(ymd_hms(2022, 9, 9, 0, 0, 0)));
        assert_eq!(parse_timestamp("9 September 2022"), Some(ymd_hms(2022, 9, 9, 0, 0, 0)));
        assert_eq!(parse_timestamp("Sep 9, 2022"), Some(ymd_hms(2022, 9, 9, 0, 0, 0)));
        assert_eq!(parse_timestamp("Septembre 9, 2022"), None);
    }

    #[test]
    fn test_offsets_normalised_to_utc() {
        assert_eq!(
            parse_timestamp("2024-01-05T10:00:00+02:00"),
            Some(ymd_hms(2024, 1, 5, 8, 0, 0))
        );
    }

    #[test]
    fn test_rejects_non_dates() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024"), None);
        assert_eq!(parse_timestamp("hello"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }
}
