//! Identity stripping for provider snapshots
//!
//! Provider responses carry `id` keys on the record and on nested objects
//! such as answers. User declarations never do, so they are removed before
//! comparison.

use serde_json::Value;

/// Key removed at every depth
pub const IDENTITY_KEY: &str = "id";

/// Return a copy of `node` with every `id` key removed, at any depth
pub fn sanitize(node: &Value) -> Value {
    let mut copy = node.clone();
    sanitize_in_place(&mut copy);
    copy
}

/// Remove every `id` key from `node`, at any depth
pub fn sanitize_in_place(node: &mut Value) {
    match node {
        Value::Object(map) => {
            map.remove(IDENTITY_KEY);
            for value in map.values_mut() {
                sanitize_in_place(value);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                sanitize_in_place(item);
            }
        }
        _ => {}
    }
}
