//! One-directional diff of desired state against a sanitized snapshot
//!
//! Only fields the user specified are compared. A field is "specified"
//! when its desired value is truthy: `false`, `0`, `""`, `[]` and `{}`
//! all count as unspecified and are skipped. This means an update can
//! never set a field to one of those values.

use crate::model::{COMPARABLE_FIELDS, DesiredRecord};
use serde_json::{Map, Value};

/// Fields present remotely but absent from the desired state are left alone.
///
/// The engine never computes removals; a user who stops specifying a field
/// keeps whatever value the provider holds.
pub const CLEARS_UNSPECIFIED_FIELDS: bool = false;

/// Result of comparing desired state against a snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    /// Whether any specified field differs
    pub changed: bool,
    /// Fields to submit in an update, with their desired values
    pub delta: Map<String, Value>,
}

/// Whether a desired value counts as "not specified"
pub fn is_unspecified(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Compare `desired` against `current`, which must already be sanitized
///
/// Equality is deep and order-sensitive for arrays.
pub fn diff(desired: &DesiredRecord, current: &Value) -> Diff {
    let mut delta = Map::new();

    for field in COMPARABLE_FIELDS {
        let Some(wanted) = desired.field(field) else {
            continue;
        };
        if is_unspecified(&wanted) {
            continue;
        }
        if current.get(field) != Some(&wanted) {
            delta.insert(field.to_string(), wanted);
        }
    }

    Diff {
        changed: !delta.is_empty(),
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Intent, RecordType};
    use crate::reconcile::sanitize::sanitize;
    use serde_json::json;

    fn desired() -> DesiredRecord {
        DesiredRecord::new("www", "example.com", RecordType::A, Intent::Create)
            .with_answers(vec![json!({"answer": ["192.168.1.0"], "meta": {"up": true}})])
            .with_filters(vec![json!({"filter": "up", "config": {}})])
    }

    #[test]
    fn test_matching_snapshot_is_unchanged() {
        let current = json!({
            "id": "rec-1",
            "domain": "www.example.com",
            "type": "A",
            "ttl": 3600,
            "answers": [{"id": "a1", "answer": ["192.168.1.0"], "meta": {"up": true}}],
            "filters": [{"filter": "up", "config": {}}],
            "tier": 3
        });

        let result = diff(&desired(), &sanitize(&current));
        assert!(!result.changed);
        assert!(result.delta.is_empty());
    }

    #[test]
    fn test_changed_and_missing_fields_in_delta() {
        let current = json!({
            "ttl": 60,
            "answers": [{"answer": ["192.168.1.0"], "meta": {"up": true}}]
        });

        let result = diff(&desired(), &current);
        assert!(result.changed);
        assert_eq!(
            Value::Object(result.delta),
            json!({
                "filters": [{"filter": "up", "config": {}}],
                "ttl": 3600
            })
        );
    }

    #[test]
    fn test_answer_order_matters() {
        let desired = DesiredRecord::new("www", "example.com", RecordType::A, Intent::Create)
            .with_answers(vec![json!({"answer": ["1.1.1.1"]}), json!({"answer": ["2.2.2.2"]})]);
        let current = json!({
            "ttl": 3600,
            "answers": [{"answer": ["2.2.2.2"]}, {"answer": ["1.1.1.1"]}]
        });

        let result = diff(&desired, &current);
        assert!(result.changed);
        assert_eq!(result.delta.keys().collect::<Vec<_>>(), vec!["answers"]);
    }

    #[test]
    fn test_unspecified_values_never_in_delta() {
        let desired = DesiredRecord::new("www", "example.com", RecordType::A, Intent::Create)
            .with_use_client_subnet(false)
            .with_link("")
            .with_filters(vec![])
            .with_meta(Map::new())
            .with_ttl(Some(0));
        let current = json!({
            "use_client_subnet": true,
            "link": "elsewhere.example.com",
            "filters": [{"filter": "up"}],
            "meta": {"note": "x"},
            "ttl": 60,
            "answers": [{"answer": ["9.9.9.9"]}]
        });

        let result = diff(&desired, &current);
        assert!(!result.changed);
        assert!(result.delta.is_empty());
    }

    #[test]
    fn test_extra_remote_fields_are_not_cleared() {
        assert!(!CLEARS_UNSPECIFIED_FIELDS);

        let desired = DesiredRecord::new("www", "example.com", RecordType::A, Intent::Create)
            .with_answers(vec![json!({"answer": ["1.1.1.1"]})]);
        let current = json!({
            "ttl": 3600,
            "answers": [{"answer": ["1.1.1.1"]}],
            "link": "stale.example.com",
            "meta": {"weight": 5}
        });

        assert_eq!(diff(&desired, &current), Diff::default());
    }
}
