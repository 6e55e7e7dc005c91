//! Record reconciliation
//!
//! The Reconciler is responsible for:
//! - Looking up the zone and the current record
//! - Comparing desired state against a sanitized snapshot
//! - Creating, updating or deleting the record (or only reporting, in dry-run)
//!
//! ## Event Flow
//!
//! 1. Load zone (missing zone + delete + `ignore_missing_zone` → done, unchanged)
//! 2. Load record by (fqdn, type); not-found means "no record"
//! 3. Decide from (record present?, intent, mode):
//!
//! ```text
//! current  intent  mode    action                       changed
//! absent   Delete  any     none                         false
//! absent   Create  DryRun  none                         true
//! absent   Create  Apply   create                       true
//! exists   Delete  DryRun  none                         true
//! exists   Delete  Apply   delete                       true
//! exists   Create  DryRun  diff only                    diff
//! exists   Create  Apply   diff, update(delta) if any   diff
//! ```
//!
//! Every provider error other than the not-found cases above aborts the
//! pass immediately. Nothing already committed by the provider is rolled
//! back.

pub mod diff;
pub mod fields;
pub mod sanitize;

pub use diff::{CLEARS_UNSPECIFIED_FIELDS, Diff, diff, is_unspecified};
pub use fields::selectable_fields;
pub use sanitize::{sanitize, sanitize_in_place};

use crate::config::RecordSpec;
use crate::error::{OptionalExt, Result};
use crate::model::{DesiredRecord, Intent, RemoteRecord};
use crate::provider::{NewRecord, RecordProvider, record_label};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Whether changes are committed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Call mutating provider operations
    #[default]
    Apply,
    /// Compute the verdict only
    DryRun,
}

/// Reconciler settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub mode: Mode,
}

impl ReconcileOptions {
    /// Options for a dry-run pass
    pub fn dry_run() -> Self {
        Self { mode: Mode::DryRun }
    }
}

/// What a pass did (or would have done, in dry-run)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Zone missing, tolerated for a delete
    ZoneMissing,
    /// No record and none wanted
    Absent,
    /// Record created
    Created,
    /// Record updated
    Updated,
    /// Record already matched
    Unchanged,
    /// Record deleted
    Deleted,
}

/// Result of a reconciliation pass
///
/// Serializes to `{"changed": .., "id": .., "data": ..}`; `id` and `data`
/// are the provider's raw record (identity fields included) and are only
/// present after an applied create/update or an applied no-op match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub changed: bool,
    #[serde(skip)]
    pub outcome: Outcome,
    #[serde(skip)]
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Report {
    fn new(changed: bool, outcome: Outcome, mode: Mode) -> Self {
        Self {
            changed,
            outcome,
            dry_run: mode == Mode::DryRun,
            id: None,
            data: None,
        }
    }

    fn with_record(mut self, record: RemoteRecord) -> Self {
        self.id = Some(record.id);
        self.data = Some(record.data);
        self
    }
}

/// Single-record reconciler
///
/// Each call to [`Reconciler::reconcile`] is one stateless pass with at
/// most three sequential provider calls.
pub struct Reconciler {
    provider: Box<dyn RecordProvider>,
    options: ReconcileOptions,
}

impl Reconciler {
    /// Create a reconciler over a provider
    pub fn new(provider: Box<dyn RecordProvider>, options: ReconcileOptions) -> Self {
        Self { provider, options }
    }

    /// The configured mode
    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    /// Converge the provider's record towards `desired`
    pub async fn reconcile(&self, desired: &DesiredRecord) -> Result<Report> {
        self.pass(desired, self.options.mode).await
    }

    /// Validate a record spec, then converge towards it
    ///
    /// An invalid spec fails before the provider is called. A spec with
    /// `dry_run` set runs in dry-run whatever the configured mode.
    pub async fn reconcile_spec(&self, spec: RecordSpec) -> Result<Report> {
        let mode = if spec.dry_run {
            Mode::DryRun
        } else {
            self.options.mode
        };
        let desired = spec.into_desired()?;
        self.pass(&desired, mode).await
    }

    async fn pass(&self, desired: &DesiredRecord, mode: Mode) -> Result<Report> {
        let provider = self.provider.provider_name();

        let zone = match self.provider.load_zone(&desired.zone).await {
            Ok(zone) => zone,
            Err(e)
                if e.is_not_found()
                    && desired.intent == Intent::Delete
                    && desired.ignore_missing_zone =>
            {
                info!(
                    "Zone {} not found on {}, nothing to delete",
                    desired.zone, provider
                );
                return Ok(Report::new(false, Outcome::ZoneMissing, mode));
            }
            Err(e) => return Err(e),
        };

        let domain = desired.fqdn();
        let current = self
            .provider
            .load_record(&zone, &domain, desired.record_type)
            .await
            .found()?;

        debug!(
            "Reconciling {} ({}) on {}: intent={:?} mode={:?} exists={}",
            domain,
            desired.record_type,
            provider,
            desired.intent,
            mode,
            current.is_some()
        );

        match (current, desired.intent) {
            (None, Intent::Delete) => {
                debug!("Record {} ({}) already absent", domain, desired.record_type);
                Ok(Report::new(false, Outcome::Absent, mode))
            }

            (None, Intent::Create) => {
                if mode == Mode::DryRun {
                    info!("[DRY-RUN] Would create {} ({})", domain, desired.record_type);
                    return Ok(Report::new(true, Outcome::Created, mode));
                }

                let request = NewRecord {
                    domain: domain.clone(),
                    record_type: desired.record_type,
                    answers: desired.answers.clone(),
                    fields: selectable_fields(desired),
                };
                let created = self.provider.create_record(&zone, request).await?;
                info!(
                    "Created {} ({}) with id {}",
                    domain, desired.record_type, created.id
                );
                Ok(Report::new(true, Outcome::Created, mode).with_record(created))
            }

            (Some(record), Intent::Delete) => {
                if mode == Mode::DryRun {
                    info!("[DRY-RUN] Would delete {}", record_label(&record));
                    return Ok(Report::new(true, Outcome::Deleted, mode));
                }

                self.provider.delete_record(&zone, &record).await?;
                info!("Deleted {}", record_label(&record));
                Ok(Report::new(true, Outcome::Deleted, mode))
            }

            (Some(record), Intent::Create) => {
                let Diff { changed, delta } = diff(desired, &sanitize(&record.data));

                if !changed {
                    debug!("Record {} already matches desired state", domain);
                    let report = Report::new(false, Outcome::Unchanged, mode);
                    return Ok(match mode {
                        Mode::Apply => report.with_record(record),
                        Mode::DryRun => report,
                    });
                }

                let fields: Vec<&str> = delta.keys().map(String::as_str).collect();
                if mode == Mode::DryRun {
                    info!("[DRY-RUN] Would update {} fields {:?}", domain, fields);
                    return Ok(Report::new(true, Outcome::Updated, mode));
                }

                info!("Updating {} fields {:?}", domain, fields);
                let updated = self.provider.update_record(&zone, &record, delta).await?;
                Ok(Report::new(true, Outcome::Updated, mode).with_record(updated))
            }
        }
    }
}
