//! Dot-path access into nested JSON objects.
//!
//! Only objects are walked. Arrays and primitives are leaves: a path may end
//! on one but never passes through one.

use serde_json::{Map, Value};

/// Value at `path`, or `None` if any segment is missing or an intermediate
/// value is not an object.
pub fn get_at_path<'a>(target: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut keys = path.split('.');
    let first = keys.next()?;
    let mut cur = target.get(first)?;
    for key in keys {
        cur = cur.as_object()?.get(key)?;
    }
    Some(cur)
}

/// Writes `value` at `path`. Intermediates that are missing or not objects are
/// replaced with `{}` first.
pub fn set_at_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    let mut keys: Vec<&str> = path.split('.').collect();
    // split always yields at least one segment
    let last = keys.pop().unwrap_or_default();

    let mut cur = target;
    for key in keys {
        let slot = cur
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        cur = map;
    }

    cur.insert(last.to_string(), value);
}

/// Calls `cb` with every leaf under `structure`, depth-first in key order.
/// A non-object `structure` has no leaves.
pub fn for_each_leaf(structure: &Value, mut cb: impl FnMut(&str, &Value)) {
    fn walk(obj: &Map<String, Value>, base: &mut String, cb: &mut dyn FnMut(&str, &Value)) {
        for (key, val) in obj {
            let len = base.len();
            if !base.is_empty() {
                base.push('.');
            }
            base.push_str(key);
            match val {
                Value::Object(inner) => walk(inner, base, cb),
                leaf => cb(base.as_str(), leaf),
            }
            base.truncate(len);
        }
    }

    if let Value::Object(obj) = structure {
        walk(obj, &mut String::new(), &mut cb);
    }
}

pub fn leaves(structure: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    for_each_leaf(structure, |path, value| out.push((path.to_string(), value.clone())));
    out
}

/// Every path a caller may address in `structure`: each object key, plus the
/// keys below it when its value is itself an object.
pub fn field_paths(structure: &Value) -> Vec<String> {
    fn walk(obj: &Map<String, Value>, base: &str, out: &mut Vec<String>) {
        for (key, val) in obj {
            let path = if base.is_empty() {
                key.clone()
            } else {
                format!("{base}.{key}")
            };
            out.push(path.clone());
            if let Value::Object(inner) = val {
                walk(inner, &path, out);
            }
        }
    }

    let mut out = Vec::new();
    if let Value::Object(obj) = structure {
        walk(obj, "", &mut out);
    }
    out
}
