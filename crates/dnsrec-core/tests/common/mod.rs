//! Test doubles and common utilities for reconciliation contract tests
//!
//! `RecordingProvider` wraps the in-memory provider and counts every call,
//! so tests can assert exactly which provider operations a pass made.

#![allow(dead_code)]

use dnsrec_core::error::{Error, Result};
use dnsrec_core::model::{DesiredRecord, Intent, RecordType, RemoteRecord, Zone};
use dnsrec_core::provider::{MemoryProvider, NewRecord, RecordProvider};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider operations, as recorded by [`RecordingProvider`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadZone(String),
    LoadRecord(String, RecordType),
    Create(NewRecord),
    Update(Map<String, Value>),
    Delete(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Create(_) | Call::Update(_) | Call::Delete(_))
    }
}

/// Which operation should fail, for error propagation tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    LoadZone,
    LoadRecord,
    Create,
    Update,
    Delete,
}

/// A provider that records every call and delegates to a MemoryProvider
#[derive(Clone)]
pub struct RecordingProvider {
    pub inner: MemoryProvider,
    calls: Arc<Mutex<Vec<Call>>>,
    fail_on: Arc<Mutex<FailOn>>,
    call_count: Arc<AtomicUsize>,
}

impl RecordingProvider {
    /// Create a recording provider holding one empty zone
    pub fn with_zone(zone: &str) -> Self {
        Self::wrap(MemoryProvider::with_zone(zone))
    }

    /// Create a recording provider with no zones at all
    pub fn without_zones() -> Self {
        Self::wrap(MemoryProvider::new())
    }

    fn wrap(inner: MemoryProvider) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: Arc::new(Mutex::new(FailOn::Nothing)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make one kind of operation fail with a provider error
    pub fn fail_on(&self, op: FailOn) {
        *self.fail_on.lock().unwrap() = op;
    }

    /// Every call recorded so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of create/update/delete calls
    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutation()).count()
    }

    /// Total number of provider calls
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Forget recorded calls (keeps stored records)
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
        self.call_count.store(0, Ordering::SeqCst);
    }

    fn record(&self, call: Call, op: FailOn) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(call);
        if *self.fail_on.lock().unwrap() == op {
            return Err(Error::provider(500, "internal server error"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordProvider for RecordingProvider {
    async fn load_zone(&self, zone: &str) -> Result<Zone> {
        self.record(Call::LoadZone(zone.to_string()), FailOn::LoadZone)?;
        self.inner.load_zone(zone).await
    }

    async fn load_record(
        &self,
        zone: &Zone,
        domain: &str,
        record_type: RecordType,
    ) -> Result<RemoteRecord> {
        self.record(
            Call::LoadRecord(domain.to_string(), record_type),
            FailOn::LoadRecord,
        )?;
        self.inner.load_record(zone, domain, record_type).await
    }

    async fn create_record(&self, zone: &Zone, record: NewRecord) -> Result<RemoteRecord> {
        self.record(Call::Create(record.clone()), FailOn::Create)?;
        self.inner.create_record(zone, record).await
    }

    async fn update_record(
        &self,
        zone: &Zone,
        record: &RemoteRecord,
        fields: Map<String, Value>,
    ) -> Result<RemoteRecord> {
        self.record(Call::Update(fields.clone()), FailOn::Update)?;
        self.inner.update_record(zone, record, fields).await
    }

    async fn delete_record(&self, zone: &Zone, record: &RemoteRecord) -> Result<()> {
        self.record(Call::Delete(record.id.clone()), FailOn::Delete)?;
        self.inner.delete_record(zone, record).await
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// The "www.example.com A" record used across contract tests
pub fn www_present() -> DesiredRecord {
    DesiredRecord::new("www", "example.com", RecordType::A, Intent::Create)
        .with_answers(vec![json!({
            "answer": ["192.168.1.0"],
            "meta": {"up": true}
        })])
        .with_filters(vec![json!({"filter": "up", "config": {}})])
}

/// The same record with a delete intent and no answers
pub fn www_absent() -> DesiredRecord {
    DesiredRecord::new("www", "example.com", RecordType::A, Intent::Delete)
}
