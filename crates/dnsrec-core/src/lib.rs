// # dnsrec-core
//
// Core library for declarative DNS record reconciliation.
//
// ## Architecture Overview
//
// Given a desired record state, the core converges a provider's record to
// match it and reports whether anything changed:
// - **Sanitizer**: strips provider-assigned `id` keys before comparison
// - **Field Selector**: picks the optional fields sent along with a create
// - **Diff Engine**: one-directional desired → current comparison
// - **Reconciler**: create / update / delete / no-op state machine
// - **RecordProvider**: trait for the remote DNS API
// - **ProviderRegistry**: plugin-based registry for providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: decision logic lives here, API calls live in providers
// 2. **Single Pass**: one record, at most three sequential provider calls
// 3. **Plugin-Based**: providers are registered by name, no hard-coded if-else
// 4. **Library-First**: the daemon binary is a thin wrapper over this crate
// 5. **Idempotency**: re-applying an unchanged desired state reports `changed=false`

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod reconcile;
pub mod registry;

// Re-export core types for convenience
pub use config::{ProviderConfig, RecordSpec};
pub use error::{Error, OptionalExt, Result};
pub use model::{DesiredRecord, Intent, RecordType, RemoteRecord, Zone};
pub use provider::{MemoryProvider, NewRecord, RecordProvider, RecordProviderFactory};
pub use reconcile::{Mode, Outcome, ReconcileOptions, Reconciler, Report};
pub use registry::ProviderRegistry;
