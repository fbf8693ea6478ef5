//! Cell values

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// ISO-8601 rendering used for timestamps in statistics and sample rows
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Rendering used for timestamps as chart labels and category labels
pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single value in a table column
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Finite floating point number
    Number(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Missing,
}

impl Cell {
    /// Build a cell from a raw token, keeping finite numbers numeric
    pub fn from_token(token: &str) -> Self {
        match parse_number(token) {
            Some(value) => Cell::Number(value),
            None => Cell::Text(token.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value of the cell, if it has one
    ///
    /// Text that parses as a finite number counts as numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(text) => parse_number(text),
            Cell::Timestamp(_) | Cell::Missing => None,
        }
    }

    /// String form used for category matching, search and labels
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Number(value) => Some(format_number(*value)),
            Cell::Text(text) => Some(text.clone()),
            Cell::Timestamp(ts) => Some(ts.format(LABEL_FORMAT).to_string()),
            Cell::Missing => None,
        }
    }
}

/// Parse a finite number, rejecting `inf`/`NaN` spellings
pub fn parse_number(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Format a number the way it is displayed as a label
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn format_iso(ts: &NaiveDateTime) -> String {
    ts.format(ISO_FORMAT).to_string()
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Number(value) => serializer.serialize_f64(*value),
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Timestamp(ts) => serializer.serialize_str(&format_iso(ts)),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_from_token() {
        assert_eq!(Cell::from_token("42"), Cell::Number(42.0));
        assert_eq!(Cell::from_token(" 2.5 "), Cell::Number(2.5));
        assert_eq!(Cell::from_token("inf"), Cell::Text("inf".to_string()));
        assert_eq!(Cell::from_token("NY"), Cell::Text("NY".to_string()));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Cell::Number(5.0).label().as_deref(), Some("5"));
        assert_eq!(Cell::Number(2.25).label().as_deref(), Some("2.25"));
        assert_eq!(Cell::Missing.label(), None);

        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(Cell::Timestamp(ts).label().as_deref(), Some("2024-03-01 08:30:00"));
    }

    #[test]
    fn test_serialize_cells() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let cells = vec![
            Cell::Number(1.5),
            Cell::Text("a".to_string()),
            Cell::Timestamp(ts),
            Cell::Missing,
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[1.5,"a","2024-03-01T00:00:00",null]"#);
    }

    #[test]
    fn test_text_as_number() {
        assert_eq!(Cell::Text("7".to_string()).as_number(), Some(7.0));
        assert_eq!(Cell::Text("seven".to_string()).as_number(), None);
    }
}
