// # Memory Provider
//
// In-memory implementation of RecordProvider.
//
// ## Purpose
//
// Behaves like a real provider API (ids assigned on create, not-found for
// missing zones and records, partial updates merged into the stored
// record) without any network access. Nothing survives a restart.
//
// ## When to Use
//
// - Testing environments
// - Embedding demos
// - Dry rehearsal of a record spec (`DNSREC_PROVIDER=memory`)

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tokio::sync::RwLock;

use crate::config::ProviderConfig;
use crate::model::{RecordType, RemoteRecord, Zone};
use crate::provider::{NewRecord, RecordProvider, RecordProviderFactory};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct ZoneEntry {
    data: Value,
    records: HashMap<(String, RecordType), Value>,
}

/// In-memory provider
///
/// Clones share the same backing store.
///
/// # Example
///
/// ```rust,no_run
/// use dnsrec_core::provider::{MemoryProvider, RecordProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = MemoryProvider::with_zone("example.com");
///     let zone = provider.load_zone("example.com").await?;
///     assert_eq!(zone.name, "example.com");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    zones: Arc<RwLock<HashMap<String, ZoneEntry>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryProvider {
    /// Create a provider with no zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding one empty zone
    pub fn with_zone(zone: impl Into<String>) -> Self {
        let zone = zone.into();
        let mut zones = HashMap::new();
        zones.insert(zone.clone(), Self::zone_entry(&zone));
        Self {
            zones: Arc::new(RwLock::new(zones)),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Add an empty zone (no-op if it already exists)
    pub async fn add_zone(&self, zone: impl Into<String>) {
        let zone = zone.into();
        let mut zones = self.zones.write().await;
        zones
            .entry(zone.clone())
            .or_insert_with(|| Self::zone_entry(&zone));
    }

    /// Number of records across all zones
    pub async fn record_count(&self) -> usize {
        self.zones
            .read()
            .await
            .values()
            .map(|z| z.records.len())
            .sum()
    }

    /// Raw stored record, identity fields included
    pub async fn get_raw(
        &self,
        zone: &str,
        domain: &str,
        record_type: RecordType,
    ) -> Option<Value> {
        self.zones
            .read()
            .await
            .get(zone)
            .and_then(|z| z.records.get(&(domain.to_string(), record_type)))
            .cloned()
    }

    fn zone_entry(zone: &str) -> ZoneEntry {
        ZoneEntry {
            data: json!({ "zone": zone, "ttl": 3600 }),
            records: HashMap::new(),
        }
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", prefix, n)
    }

    /// Give every answer object its own id, as real providers do
    fn assign_answer_ids(&self, answers: &mut Value) {
        if let Value::Array(items) = answers {
            for item in items.iter_mut() {
                if let Value::Object(answer) = item {
                    if !answer.contains_key("id") {
                        answer.insert("id".to_string(), Value::from(self.fresh_id("ans")));
                    }
                }
            }
        }
    }
}

fn key_of(record: &RemoteRecord) -> Result<(String, RecordType)> {
    let (domain, record_type) = record.locator()?;
    Ok((domain.to_string(), record_type))
}

#[async_trait]
impl RecordProvider for MemoryProvider {
    async fn load_zone(&self, zone: &str) -> Result<Zone> {
        let zones = self.zones.read().await;
        let entry = zones
            .get(zone)
            .ok_or_else(|| Error::not_found(format!("zone {}", zone)))?;
        Ok(Zone::new(zone, entry.data.clone()))
    }

    async fn load_record(
        &self,
        zone: &Zone,
        domain: &str,
        record_type: RecordType,
    ) -> Result<RemoteRecord> {
        let zones = self.zones.read().await;
        let data = zones
            .get(&zone.name)
            .ok_or_else(|| Error::not_found(format!("zone {}", zone.name)))?
            .records
            .get(&(domain.to_string(), record_type))
            .ok_or_else(|| Error::not_found(format!("record {} ({})", domain, record_type)))?;
        RemoteRecord::from_data(data.clone())
    }

    async fn create_record(&self, zone: &Zone, record: NewRecord) -> Result<RemoteRecord> {
        let mut body = record.body(&zone.name);
        if let Some(answers) = body.get_mut("answers") {
            self.assign_answer_ids(answers);
        }
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), Value::from(self.fresh_id("rec")));
        }

        let mut zones = self.zones.write().await;
        let entry = zones
            .get_mut(&zone.name)
            .ok_or_else(|| Error::not_found(format!("zone {}", zone.name)))?;

        let key = (record.domain.clone(), record.record_type);
        if entry.records.contains_key(&key) {
            return Err(Error::provider(400, "record already exists"));
        }
        entry.records.insert(key, body.clone());

        RemoteRecord::from_data(body)
    }

    async fn update_record(
        &self,
        zone: &Zone,
        record: &RemoteRecord,
        mut fields: Map<String, Value>,
    ) -> Result<RemoteRecord> {
        let key = key_of(record)?;
        if let Some(answers) = fields.get_mut("answers") {
            self.assign_answer_ids(answers);
        }

        let mut zones = self.zones.write().await;
        let stored = zones
            .get_mut(&zone.name)
            .ok_or_else(|| Error::not_found(format!("zone {}", zone.name)))?
            .records
            .get_mut(&key)
            .ok_or_else(|| Error::not_found(format!("record {} ({})", key.0, key.1)))?;

        if let Value::Object(map) = stored {
            map.extend(fields);
        }

        RemoteRecord::from_data(stored.clone())
    }

    async fn delete_record(&self, zone: &Zone, record: &RemoteRecord) -> Result<()> {
        let key = key_of(record)?;
        let mut zones = self.zones.write().await;
        zones
            .get_mut(&zone.name)
            .ok_or_else(|| Error::not_found(format!("zone {}", zone.name)))?
            .records
            .remove(&key)
            .ok_or_else(|| Error::not_found(format!("record {} ({})", key.0, key.1)))?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for in-memory providers
pub struct MemoryProviderFactory;

impl RecordProviderFactory for MemoryProviderFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
        match config {
            ProviderConfig::Memory { zones } => {
                let zones = zones
                    .iter()
                    .map(|z| (z.clone(), MemoryProvider::zone_entry(z)))
                    .collect();
                Ok(Box::new(MemoryProvider {
                    zones: Arc::new(RwLock::new(zones)),
                    next_id: Arc::default(),
                }))
            }
            _ => Err(Error::config("Invalid config for memory provider")),
        }
    }
}
