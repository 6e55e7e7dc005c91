//! Contract Test: Convergence & Idempotency
//!
//! Re-running a pass with unchanged desired state must report
//! `changed=false`, and the sanitizer/diff pair must treat a record the
//! provider produced from the desired state as equal to it.

mod common;

use common::*;
use dnsrec_core::model::{COMPARABLE_FIELDS, DesiredRecord, Intent, RecordType};
use dnsrec_core::reconcile::{diff, is_unspecified, sanitize};
use dnsrec_core::{ReconcileOptions, Reconciler};
use serde_json::{Map, Value, json};

fn apply(provider: &RecordingProvider) -> Reconciler {
    Reconciler::new(Box::new(provider.clone()), ReconcileOptions::default())
}

fn has_id(node: &Value) -> bool {
    match node {
        Value::Object(map) => map.contains_key("id") || map.values().any(has_id),
        Value::Array(items) => items.iter().any(has_id),
        _ => false,
    }
}

/// `{"id": d, "k": {"id": d-1, "k": [ ... ]}}`, `depth` levels deep
fn nested(depth: usize) -> Value {
    let mut node = json!({"id": 0, "leaf": "value"});
    for level in 1..=depth {
        node = if level % 2 == 0 {
            json!({"id": level, "k": node, "n": level})
        } else {
            json!([{"id": level, "k": node}, level, "id"])
        };
    }
    node
}

#[test]
fn sanitizer_removes_ids_at_every_depth() {
    for depth in 0..8 {
        let raw = nested(depth);
        let clean = sanitize(&raw);

        assert!(!has_id(&clean), "depth {}: {}", depth, clean);
        // Stripping the clean copy again changes nothing
        assert_eq!(sanitize(&clean), clean);
        // Only the "id" keys were lost
        assert_eq!(
            clean.to_string().matches("leaf").count(),
            raw.to_string().matches("leaf").count()
        );
    }
}

#[test]
fn delta_never_contains_unspecified_values() {
    let desired = DesiredRecord::new("www", "example.com", RecordType::Txt, Intent::Create)
        .with_answers(vec![])
        .with_use_client_subnet(false)
        .with_link("")
        .with_filters(vec![])
        .with_regions(Map::new())
        .with_ttl(None);
    let current = json!({"ttl": 10, "answers": [{"answer": ["x"]}], "use_client_subnet": true});

    let result = diff(&desired, &current);
    assert!(!result.changed);

    let desired = www_present().with_link("");
    let result = diff(&desired, &json!({}));
    assert!(result.changed);
    for field in COMPARABLE_FIELDS {
        if let Some(value) = result.delta.get(field) {
            assert!(!is_unspecified(value), "{} = {}", field, value);
        }
    }
    assert!(!result.delta.contains_key("link"));
}

#[tokio::test]
async fn applied_record_diffs_clean_against_desired() {
    let provider = RecordingProvider::with_zone("example.com");
    let regions = json!({"east": {"meta": {"georegion": ["US-EAST"]}}})
        .as_object()
        .cloned()
        .unwrap();
    let desired = www_present()
        .with_use_client_subnet(true)
        .with_link("other.example.com")
        .with_regions(regions)
        .with_ttl(Some(900));

    let report = apply(&provider).reconcile(&desired).await.unwrap();
    let data = report.data.unwrap();

    assert!(has_id(&data), "raw output keeps identity fields");
    let verdict = diff(&desired, &sanitize(&data));
    assert!(!verdict.changed, "{:?}", verdict.delta);
}

#[tokio::test]
async fn end_to_end_create_then_reapply() {
    let provider = RecordingProvider::with_zone("example.com");

    // No existing record: one create, provider-assigned id in the output
    let first = apply(&provider).reconcile(&www_present()).await.unwrap();
    assert!(first.changed);
    assert_eq!(provider.mutation_count(), 1);
    let id = first.id.clone().unwrap();
    assert!(!id.is_empty());
    assert_eq!(first.data.as_ref().unwrap()["id"], json!(id));

    // Same desired state again: nothing to do
    provider.reset_calls();
    let second = apply(&provider).reconcile(&www_present()).await.unwrap();
    assert!(!second.changed);
    assert_eq!(provider.mutation_count(), 0);
}

#[tokio::test]
async fn end_to_end_delete_then_reapply() {
    let provider = RecordingProvider::with_zone("example.com");
    apply(&provider).reconcile(&www_present()).await.unwrap();

    provider.reset_calls();
    let first = apply(&provider).reconcile(&www_absent()).await.unwrap();
    assert!(first.changed);
    assert_eq!(provider.mutation_count(), 1);

    provider.reset_calls();
    let second = apply(&provider).reconcile(&www_absent()).await.unwrap();
    assert!(!second.changed);
    assert_eq!(provider.mutation_count(), 0);
}

#[tokio::test]
async fn fully_qualified_name_targets_same_record() {
    let provider = RecordingProvider::with_zone("example.com");
    apply(&provider).reconcile(&www_present()).await.unwrap();

    let mut fqdn = www_present();
    fqdn.name = "www.example.com".to_string();
    let report = apply(&provider).reconcile(&fqdn).await.unwrap();

    assert!(!report.changed);
    assert_eq!(provider.inner.record_count().await, 1);
}
