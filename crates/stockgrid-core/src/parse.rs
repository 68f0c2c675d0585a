//! Type-specific parsing for number and date columns
//!
//! Both parsers return `None` for anything they cannot read. Callers treat
//! `None` as "no value" and never substitute zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{ColumnType, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a value as a finite float
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Int(v) => *v as f64,
        Value::Float(v) => *v,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Parse a value as milliseconds since the Unix epoch (UTC)
///
/// Integers are taken as epoch milliseconds already.
pub fn parse_date(value: &Value) -> Option<i64> {
    match value {
        Value::Date(d) => Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis()),
        Value::DateTime(dt) => Some(dt.and_utc().timestamp_millis()),
        Value::Int(ms) => Some(*ms),
        Value::Float(ms) if ms.is_finite() => Some(*ms as i64),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
        }
    }
    None
}

/// Numeric sort/compare key for number and date columns
///
/// Returns `None` for text columns and for unparseable values.
pub fn numeric_key(column_type: ColumnType, value: &Value) -> Option<f64> {
    match column_type {
        ColumnType::Number => parse_number(value),
        ColumnType::Date => parse_date(value).map(|ms| ms as f64),
        ColumnType::Text => None,
    }
}
