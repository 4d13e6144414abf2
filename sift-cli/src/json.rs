//! JSON context files and result rendering.

use std::fs;

use sift_common::{Context, Value};

/// Load a JSON object file as an evaluation context.
pub fn load_context(path: &str) -> Result<Context, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("cannot read '{path}': {e}");
        1
    })?;
    let parsed: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        eprintln!("invalid JSON in '{path}': {e}");
        1
    })?;
    let serde_json::Value::Object(entries) = parsed else {
        eprintln!("context file '{path}' must hold a JSON object");
        return Err(1);
    };
    Ok(entries
        .into_iter()
        .map(|(key, value)| (key, from_json(value)))
        .collect())
}

/// Convert a JSON value to a runtime value.
pub fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => {
            Value::array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(entries) => Value::object(
            entries
                .into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

/// Convert a runtime value to JSON for display. `undefined` becomes
/// `null`, functions a marker string.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Undefined | Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            // Whole numbers print without a trailing .0.
            if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                serde_json::Value::Number(serde_json::Number::from(*n as i64))
            } else {
                serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::BigInt(n) => serde_json::Value::String(n.to_string()),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Array(elements) => {
            serde_json::Value::Array(elements.borrow().iter().map(to_json).collect())
        }
        Value::Object(entries) => serde_json::Value::Object(
            entries
                .borrow()
                .iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
        Value::Function(_) | Value::Native(_) => {
            serde_json::Value::String("[function]".to_string())
        }
    }
}
