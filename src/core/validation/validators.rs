//! Reusable field validators
//!
//! Each factory returns a closure checking one field of a raw JSON payload.
//! The closure receives the JSON field name and its value and answers with the
//! human-readable reason on failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Whether a field counts as not supplied
///
/// Absent, `null`, `false` and `""` are missing; numeric zero is present.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Validator: string with at least `min` characters once trimmed
pub fn min_trimmed_chars(
    label: &'static str,
    min: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value.as_str() {
        Some(s) if s.trim().chars().count() >= min => Ok(()),
        _ => Err(format!("{} must be at least {} characters long", label, min)),
    }
}

/// Validator: JSON number that is zero or greater
pub fn non_negative_number(
    label: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value.as_f64() {
        Some(num) if num.is_finite() && num >= 0.0 => Ok(()),
        _ => Err(format!("{} must be a positive number", label)),
    }
}

/// Validator: JSON number with no fractional part, at least `min`
///
/// `2.0` is accepted as two.
pub fn whole_number_at_least(
    label: &'static str,
    min: u32,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match as_whole_number(value) {
        Some(n) if n >= min => Ok(()),
        _ => Err(format!("{} must be at least {}", label, min)),
    }
}

/// Validator: the value parses as a calendar date
pub fn calendar_date(
    label: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match parse_calendar_date(value) {
        Some(_) => Ok(()),
        None => Err(format!("Invalid {} date format", label)),
    }
}

/// Read a whole number that fits in `u32`
pub fn as_whole_number(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let num = value.as_f64()?;
    if num.is_finite() && num >= 0.0 && num.fract() == 0.0 && num <= f64::from(u32::MAX) {
        Some(num as u32)
    } else {
        None
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar day
///
/// Timestamps are converted to UTC before the date is taken.
pub fn parse_calendar_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).date_naive())
}
