use crate::json_equality::values_equal;
use serde_json::{Map, Value};

/// Remove the contribution described by `pattern` from `target`.
///
/// The pattern records what an earlier install added. Sequences are filtered as
/// sets of entries, mappings are walked key by key, and scalar leaves are only
/// removed when the target still holds exactly the recorded value. Keys whose
/// value becomes an empty mapping or sequence are pruned from their parent.
///
/// Any shape mismatch between target and pattern leaves that subtree untouched,
/// which makes the operation idempotent. The target is never modified; the
/// returned value is independently owned.
pub fn remove_json_value(target: &Value, pattern: &Value) -> Value {
    match (target, pattern) {
        (Value::Array(items), Value::Array(pattern_items)) => {
            Value::Array(retain_unmatched(items, pattern_items))
        },
        (Value::Object(target_obj), Value::Object(pattern_obj)) => {
            Value::Object(remove_json_map(target_obj, pattern_obj))
        },
        (target_value, _) => target_value.clone(),
    }
}

/// Mapping arm of [`remove_json_value`]. Surviving keys keep the target's order.
pub fn remove_json_map(
    target: &Map<String, Value>,
    pattern: &Map<String, Value>,
) -> Map<String, Value> {
    target
        .iter()
        .filter_map(|(key, value)| {
            let remaining = match pattern.get(key) {
                Some(pattern_value) => remove_entry(value, pattern_value)?,
                None => value.clone(),
            };
            Some((key.clone(), remaining))
        })
        .collect()
}

/// Returns `None` when the entry should be dropped from its parent mapping.
fn remove_entry(value: &Value, pattern: &Value) -> Option<Value> {
    match (value, pattern) {
        (Value::Array(items), Value::Array(pattern_items)) => {
            let remaining = retain_unmatched(items, pattern_items);
            (!remaining.is_empty()).then_some(Value::Array(remaining))
        },
        (Value::Object(obj), Value::Object(pattern_obj)) => {
            let remaining = remove_json_map(obj, pattern_obj);
            (!remaining.is_empty()).then_some(Value::Object(remaining))
        },
        (_, Value::Array(_) | Value::Object(_)) => Some(value.clone()),
        (existing, scalar) => (!values_equal(existing, scalar)).then(|| existing.clone()),
    }
}

fn retain_unmatched(items: &[Value], pattern_items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .filter(|item| !pattern_items.iter().any(|candidate| values_equal(item, candidate)))
        .cloned()
        .collect()
}
