//! Configuration types
//!
//! - [`RecordSpec`]: the flat, declarative record specification a user writes
//! - [`ProviderConfig`]: which provider to talk to, and how

use crate::error::{Error, Result};
use crate::model::{DEFAULT_TTL, DesiredRecord, Intent, RecordType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Declarative record specification
///
/// Field names follow the flat option set users write, e.g.
///
/// ```json
/// {
///   "apiKey": "...",
///   "name": "www",
///   "zone": "example.com",
///   "type": "A",
///   "state": "present",
///   "answers": [{"answer": ["192.168.1.0"], "meta": {"up": true}}],
///   "filters": [{"filter": "up", "config": {}}]
/// }
/// ```
///
/// Required fields default to empty so that [`RecordSpec::validate`] can
/// report them by name instead of failing deserialization.
#[derive(Clone, Serialize, Deserialize)]
pub struct RecordSpec {
    /// present | active | absent | deleted
    #[serde(default = "default_state")]
    pub state: String,

    /// Provider API key
    /// ⚠️ NEVER log this value
    #[serde(rename = "apiKey", alias = "api_key", default)]
    pub api_key: String,

    /// Record name
    #[serde(default)]
    pub name: String,

    /// Zone name
    #[serde(default)]
    pub zone: String,

    /// Record type, case-insensitive
    #[serde(rename = "type", default)]
    pub record_type: String,

    /// Ordered answers (may be empty when deleting)
    #[serde(default)]
    pub answers: Vec<Value>,

    /// Treat a missing zone as "nothing to delete"
    #[serde(default)]
    pub ignore_missing_zone: bool,

    #[serde(default)]
    pub use_client_subnet: Option<bool>,

    #[serde(default)]
    pub meta: Option<Map<String, Value>>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<Value>>,

    /// Time-to-live; an explicit `null` leaves it to the provider
    #[serde(default = "default_ttl")]
    pub ttl: Option<u32>,

    #[serde(default)]
    pub regions: Option<Map<String, Value>>,

    /// Compute the verdict without mutating anything
    #[serde(default)]
    pub dry_run: bool,

    /// Override the provider API endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

// Custom Debug implementation that hides the API key
impl fmt::Debug for RecordSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSpec")
            .field("state", &self.state)
            .field("api_key", &"<REDACTED>")
            .field("name", &self.name)
            .field("zone", &self.zone)
            .field("record_type", &self.record_type)
            .field("answers", &self.answers)
            .field("ignore_missing_zone", &self.ignore_missing_zone)
            .field("use_client_subnet", &self.use_client_subnet)
            .field("meta", &self.meta)
            .field("link", &self.link)
            .field("filters", &self.filters)
            .field("ttl", &self.ttl)
            .field("regions", &self.regions)
            .field("dry_run", &self.dry_run)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl RecordSpec {
    /// Parse a spec from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a spec from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Read a spec from any reader (e.g. stdin)
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_json_str(&text)
    }

    /// Validate the spec
    ///
    /// Runs before any provider call: required fields, enum values, and
    /// answers for a create.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::config("apiKey is required"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::config("name is required"));
        }
        if self.zone.trim().is_empty() {
            return Err(Error::config("zone is required"));
        }
        if self.record_type.trim().is_empty() {
            return Err(Error::config("type is required"));
        }

        self.record_type.parse::<RecordType>()?;
        let intent = Intent::from_state(&self.state)?;

        if intent == Intent::Create && self.answers.is_empty() {
            return Err(Error::config(
                "answers must contain at least one answer when state is present",
            ));
        }

        if let Some(endpoint) = &self.endpoint {
            validate_endpoint(endpoint)?;
        }

        Ok(())
    }

    /// Validate and convert into a [`DesiredRecord`]
    pub fn into_desired(self) -> Result<DesiredRecord> {
        self.validate()?;

        let record_type = self.record_type.parse()?;
        let intent = Intent::from_state(&self.state)?;

        Ok(DesiredRecord {
            name: self.name,
            zone: self.zone,
            record_type,
            intent,
            answers: self.answers,
            ttl: self.ttl,
            use_client_subnet: self.use_client_subnet,
            meta: self.meta,
            link: self.link,
            filters: self.filters,
            regions: self.regions,
            ignore_missing_zone: self.ignore_missing_zone,
        })
    }

    /// Provider configuration carried by this spec
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::Ns1 {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

fn default_state() -> String {
    "present".to_string()
}

fn default_ttl() -> Option<u32> {
    Some(DEFAULT_TTL)
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
        return Err(Error::config(format!(
            "endpoint must use HTTP or HTTPS scheme. Got: {}",
            endpoint
        )));
    }
    Ok(())
}

/// Provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// NS1 REST API
    Ns1 {
        /// API key
        /// ⚠️ NEVER log this value
        api_key: String,
        /// Endpoint override (defaults to the public API)
        endpoint: Option<String>,
    },

    /// In-memory provider, seeded with empty zones
    Memory {
        #[serde(default)]
        zones: Vec<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: Value,
    },
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Ns1 { endpoint, .. } => f
                .debug_struct("Ns1")
                .field("api_key", &"<REDACTED>")
                .field("endpoint", endpoint)
                .finish(),
            ProviderConfig::Memory { zones } => {
                f.debug_struct("Memory").field("zones", zones).finish()
            }
            ProviderConfig::Custom { factory, .. } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", &"<OPAQUE>")
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::Ns1 { api_key, endpoint } => {
                if api_key.is_empty() {
                    return Err(Error::config("NS1 API key cannot be empty"));
                }
                if let Some(endpoint) = endpoint {
                    validate_endpoint(endpoint)?;
                }
                Ok(())
            }
            ProviderConfig::Memory { .. } => Ok(()),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Ns1 { .. } => "ns1",
            ProviderConfig::Memory { .. } => "memory",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}
