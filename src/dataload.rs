// 🧹 Document cleanup helpers
// Numeric coercion, empty-field sweep and single-element unwrap over serde_json values

use serde_json::{Map, Number, Value};

// ============================================================================
// NUMERIC COERCION
// ============================================================================

/// Parse a numeric-looking string: integers first, then finite floats
pub fn safe_number(s: &str) -> Option<Number> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = trimmed.parse::<u64>() {
        return Some(Number::from(u));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

/// Replace numeric-looking strings with numbers, recursively
///
/// Values under a key listed in `skipped_keys` are left untouched.
pub fn value_convert_to_number(value: &mut Value, skipped_keys: &[String]) {
    match value {
        Value::String(s) => {
            if let Some(n) = safe_number(s) {
                *value = Value::Number(n);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                value_convert_to_number(item, skipped_keys);
            }
        }
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if skipped_keys.iter().any(|k| k == key) {
                    continue;
                }
                value_convert_to_number(val, skipped_keys);
            }
        }
        _ => {}
    }
}

// ============================================================================
// SWEEP
// ============================================================================

/// Values removed by `dict_sweep` when no explicit list is given
pub fn default_sweep_values() -> Vec<Value> {
    vec![Value::Null, Value::String(String::new())]
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn sweep_array(items: &mut Vec<Value>, vals: &[Value]) {
    for item in items.iter_mut() {
        sweep_value(item, vals);
    }
    items.retain(|item| !vals.contains(item) && !is_empty_container(item));
}

fn sweep_value(value: &mut Value, vals: &[Value]) {
    match value {
        Value::Object(map) => dict_sweep(map, vals),
        Value::Array(items) => sweep_array(items, vals),
        _ => {}
    }
}

/// Remove fields whose value is in `vals`, recursively
///
/// Matching list items are dropped too, and a field left holding an empty
/// list or empty object is removed.
pub fn dict_sweep(map: &mut Map<String, Value>, vals: &[Value]) {
    for value in map.values_mut() {
        sweep_value(value, vals);
    }
    map.retain(|_, value| !vals.contains(value) && !is_empty_container(value));
}

// ============================================================================
// UNLIST
// ============================================================================

/// Replace every single-element list with its element, recursively
pub fn unlist(value: &mut Value) {
    match value {
        Value::Array(items) if items.len() == 1 => {
            let mut only = items.pop().unwrap_or(Value::Null);
            unlist(&mut only);
            *value = only;
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                unlist(item);
            }
        }
        Value::Object(map) => {
            for val in map.values_mut() {
                unlist(val);
            }
        }
        _ => {}
    }
}
