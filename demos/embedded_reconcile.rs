//! Minimal embedding example for dnsrec-core
//!
//! This example drives the reconciler from application code with a custom
//! provider wrapped around the in-memory one. The application owns the
//! runtime and decides when a pass runs.

use async_trait::async_trait;
use dnsrec_core::model::{RecordType, RemoteRecord, Zone};
use dnsrec_core::{
    DesiredRecord, Intent, MemoryProvider, NewRecord, ReconcileOptions, RecordProvider,
    Reconciler, Result,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Custom provider that counts mutations before delegating
#[derive(Clone)]
struct EmbeddedProvider {
    inner: MemoryProvider,
    mutations: Arc<AtomicUsize>,
}

impl EmbeddedProvider {
    fn new(zone: &str) -> Self {
        Self {
            inner: MemoryProvider::with_zone(zone),
            mutations: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordProvider for EmbeddedProvider {
    async fn load_zone(&self, zone: &str) -> Result<Zone> {
        self.inner.load_zone(zone).await
    }

    async fn load_record(
        &self,
        zone: &Zone,
        domain: &str,
        record_type: RecordType,
    ) -> Result<RemoteRecord> {
        self.inner.load_record(zone, domain, record_type).await
    }

    async fn create_record(&self, zone: &Zone, record: NewRecord) -> Result<RemoteRecord> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        println!("[Embedded] Creating {} {}", record.domain, record.record_type);
        self.inner.create_record(zone, record).await
    }

    async fn update_record(
        &self,
        zone: &Zone,
        record: &RemoteRecord,
        changes: Map<String, Value>,
    ) -> Result<RemoteRecord> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        println!("[Embedded] Updating {} with {:?}", record.id, changes.keys());
        self.inner.update_record(zone, record, changes).await
    }

    async fn delete_record(&self, zone: &Zone, record: &RemoteRecord) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        println!("[Embedded] Deleting {}", record.id);
        self.inner.delete_record(zone, record).await
    }

    fn provider_name(&self) -> &'static str {
        "embedded"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    println!("=== Embedded dnsrec-core Example ===\n");

    let provider = EmbeddedProvider::new("example.com");

    let www = DesiredRecord::new("www", "example.com", RecordType::A, Intent::Create)
        .with_answers(vec![json!({"answer": ["192.168.1.1"]})])
        .with_ttl(Some(300));

    println!("1. Dry-run pass (nothing is written)...");
    let preview = Reconciler::new(Box::new(provider.clone()), ReconcileOptions::dry_run());
    let report = preview.reconcile(&www).await?;
    println!("   {}", serde_json::to_string(&report)?);

    let reconciler = Reconciler::new(Box::new(provider.clone()), ReconcileOptions::default());

    println!("2. First applied pass creates the record...");
    let report = reconciler.reconcile(&www).await?;
    println!("   {}", serde_json::to_string(&report)?);

    println!("3. Second pass converges (no change)...");
    let report = reconciler.reconcile(&www).await?;
    println!("   changed = {}", report.changed);

    println!("4. Changing the TTL sends only the TTL...");
    let report = reconciler.reconcile(&www.clone().with_ttl(Some(60))).await?;
    println!("   changed = {}", report.changed);

    println!("5. Removing the record...");
    let mut gone = www.clone();
    gone.intent = Intent::Delete;
    let report = reconciler.reconcile(&gone).await?;
    println!("   changed = {}", report.changed);

    println!("\n=== Embedding Successful ===");
    println!("Mutations sent to provider: {}", provider.mutation_count());

    Ok(())
}
