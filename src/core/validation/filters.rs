//! Reusable field filters
//!
//! Filters normalize a raw field value before it is converted into a typed
//! booking field.

use anyhow::Result;
use serde_json::{Map, Value};

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// A filter refused the value of one field
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FilterError {
    pub field: String,
    pub message: String,
}

/// Apply a filter to the named fields of a payload object, in place
pub fn apply_to_fields<F>(
    payload: &mut Map<String, Value>,
    fields: &[&str],
    filter: F,
) -> Result<(), FilterError>
where
    F: Fn(&str, Value) -> Result<Value>,
{
    for field in fields {
        if let Some(value) = payload.remove(*field) {
            let filtered = filter(field, value).map_err(|e| FilterError {
                field: (*field).to_string(),
                message: e.to_string(),
            })?;
            payload.insert((*field).to_string(), filtered);
        }
    }
    Ok(())
}
