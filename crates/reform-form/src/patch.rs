use serde_json::{Map, Value};

use crate::path::{for_each_leaf, set_at_path};

/// Deep, leaf-wise merge of `partial` into `target`. Leaves that `partial`
/// does not mention are left alone, including siblings under branches it only
/// partly specifies.
pub fn apply_patch(target: &mut Map<String, Value>, partial: &Value) {
    for_each_leaf(partial, |path, value| set_at_path(target, path, value.clone()));
}

/// Swaps the whole content of `target` for a deep copy of `source`.
///
/// Keys of `target` absent from `source` stay present but are cleared to
/// `null`. A non-object `source` only clears.
pub fn replace_values(target: &mut Map<String, Value>, source: &Value) {
    for value in target.values_mut() {
        *value = Value::Null;
    }

    if let Value::Object(src) = source {
        for (key, value) in src {
            target.insert(key.clone(), value.clone());
        }
    }
}
