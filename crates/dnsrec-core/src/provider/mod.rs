// # Record Provider Trait
//
// Defines the interface to a remote DNS provider API.
//
// ## Implementations
//
// - NS1: `dnsrec-provider-ns1` crate
// - In-memory: [`MemoryProvider`] (tests, demos, offline runs)
//
// ## Usage
//
// ```rust,ignore
// use dnsrec_core::{RecordProvider, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* RecordProvider implementation */;
//
//     let zone = provider.load_zone("example.com").await?;
//     let record = provider
//         .load_record(&zone, "www.example.com", RecordType::A)
//         .await?;
//     println!("{}", record.id);
//
//     Ok(())
// }
// ```

pub mod memory;

pub use memory::{MemoryProvider, MemoryProviderFactory};

use crate::model::{RecordType, RemoteRecord, Zone};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Everything a provider needs to create a record
///
/// The record type travels as a typed enum; each provider maps it to its
/// own type-specific create endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Fully qualified domain
    pub domain: String,
    /// Record type selecting the create operation
    pub record_type: RecordType,
    /// Ordered answers, passed separately from the other fields
    pub answers: Vec<Value>,
    /// Optional fields from the field selector
    pub fields: Map<String, Value>,
}

impl NewRecord {
    /// Full request body: `fields` plus zone, domain, type and answers
    pub fn body(&self, zone: &str) -> Value {
        let mut body = self.fields.clone();
        body.insert("zone".to_string(), Value::from(zone));
        body.insert("domain".to_string(), Value::from(self.domain.clone()));
        body.insert("type".to_string(), Value::from(self.record_type.as_str()));
        body.insert("answers".to_string(), Value::Array(self.answers.clone()));
        Value::Object(body)
    }
}

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Contract
///
/// - Missing zones and records are reported as [`crate::Error::NotFound`];
///   the reconciler branches on it.
/// - Every other failure is [`crate::Error::Provider`] (status code and
///   message) or [`crate::Error::Http`] for transport failures.
/// - One API call per method. No retries, no backoff, no caching: a failure
///   is returned as-is and aborts the reconciliation pass.
/// - Providers never decide *whether* to change a record. That is owned by
///   the [`crate::Reconciler`].
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Load a zone by name
    async fn load_zone(&self, zone: &str) -> Result<Zone, crate::Error>;

    /// Load a record by domain and type within a zone
    async fn load_record(
        &self,
        zone: &Zone,
        domain: &str,
        record_type: RecordType,
    ) -> Result<RemoteRecord, crate::Error>;

    /// Create a record, returning the provider's stored representation
    async fn create_record(
        &self,
        zone: &Zone,
        record: NewRecord,
    ) -> Result<RemoteRecord, crate::Error>;

    /// Apply a partial field update to an existing record
    async fn update_record(
        &self,
        zone: &Zone,
        record: &RemoteRecord,
        fields: Map<String, Value>,
    ) -> Result<RemoteRecord, crate::Error>;

    /// Delete an existing record
    async fn delete_record(&self, zone: &Zone, record: &RemoteRecord)
    -> Result<(), crate::Error>;

    /// Provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing providers from configuration
pub trait RecordProviderFactory: Send + Sync {
    /// Create a boxed provider from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn RecordProvider>, crate::Error>;
}

/// Domain and type as a provider sees them, for log lines
pub(crate) fn record_label(record: &RemoteRecord) -> String {
    let domain = record.data.get("domain").and_then(Value::as_str).unwrap_or("?");
    let kind = record.data.get("type").and_then(Value::as_str).unwrap_or("?");
    format!("{} ({})", domain, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record_body() {
        let mut fields = Map::new();
        fields.insert("ttl".to_string(), json!(300));
        let record = NewRecord {
            domain: "www.example.com".to_string(),
            record_type: RecordType::Txt,
            answers: vec![json!({"answer": ["hello"]})],
            fields,
        };

        assert_eq!(
            record.body("example.com"),
            json!({
                "zone": "example.com",
                "domain": "www.example.com",
                "type": "TXT",
                "answers": [{"answer": ["hello"]}],
                "ttl": 300
            })
        );
    }
}
