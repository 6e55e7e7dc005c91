//! Record data model
//!
//! Desired state as declared by the user, and the provider snapshots
//! it is compared against.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Default record TTL in seconds
pub const DEFAULT_TTL: u32 = 3600;

/// Fields eligible for diffing and update, in comparison order
pub const COMPARABLE_FIELDS: [&str; 7] = [
    "use_client_subnet",
    "meta",
    "link",
    "filters",
    "ttl",
    "regions",
    "answers",
];

/// Fields sent alongside answers when creating a record
///
/// `COMPARABLE_FIELDS` minus `answers`, which the create call takes
/// separately.
pub const SELECTABLE_FIELDS: [&str; 6] = [
    "use_client_subnet",
    "meta",
    "link",
    "filters",
    "ttl",
    "regions",
];

/// Supported DNS record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Alias,
    Afsdb,
    Cname,
    Dname,
    Hinfo,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Rp,
    Spf,
    Srv,
    Txt,
}

impl RecordType {
    /// Every supported record type
    pub const ALL: [RecordType; 15] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Alias,
        RecordType::Afsdb,
        RecordType::Cname,
        RecordType::Dname,
        RecordType::Hinfo,
        RecordType::Mx,
        RecordType::Naptr,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Rp,
        RecordType::Spf,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// Uppercase wire name (e.g. "AAAA")
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
            RecordType::Afsdb => "AFSDB",
            RecordType::Cname => "CNAME",
            RecordType::Dname => "DNAME",
            RecordType::Hinfo => "HINFO",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Rp => "RP",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "unsupported record type '{}'. Supported types: {}",
                    s,
                    RecordType::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

/// Normalized lifecycle intent
///
/// `present`/`active` and `absent`/`deleted` collapse into two intents
/// before any decision logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Create,
    Delete,
}

impl Intent {
    /// Normalize a user-facing `state` value
    pub fn from_state(state: &str) -> Result<Self> {
        match state.trim().to_ascii_lowercase().as_str() {
            "present" | "active" => Ok(Intent::Create),
            "absent" | "deleted" => Ok(Intent::Delete),
            other => Err(Error::invalid_input(format!(
                "unsupported state '{}'. Supported states: present, active, absent, deleted",
                other
            ))),
        }
    }
}

/// The user-specified target state of one record
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredRecord {
    /// Record name, relative or fully qualified
    pub name: String,
    /// Zone the record lives in
    pub zone: String,
    /// Record type
    pub record_type: RecordType,
    /// Create or delete
    pub intent: Intent,
    /// Ordered answer objects
    pub answers: Vec<Value>,
    /// Time-to-live (defaults to 3600)
    pub ttl: Option<u32>,
    /// EDNS client-subnet toggle
    pub use_client_subnet: Option<bool>,
    /// Opaque record metadata
    pub meta: Option<Map<String, Value>>,
    /// Linked record target
    pub link: Option<String>,
    /// Ordered filter chain
    pub filters: Option<Vec<Value>>,
    /// Opaque region definitions
    pub regions: Option<Map<String, Value>>,
    /// Treat a missing zone as "nothing to delete"
    pub ignore_missing_zone: bool,
}

impl DesiredRecord {
    /// Create a desired record with no answers and the default TTL
    pub fn new(
        name: impl Into<String>,
        zone: impl Into<String>,
        record_type: RecordType,
        intent: Intent,
    ) -> Self {
        Self {
            name: name.into(),
            zone: zone.into(),
            record_type,
            intent,
            answers: Vec::new(),
            ttl: Some(DEFAULT_TTL),
            use_client_subnet: None,
            meta: None,
            link: None,
            filters: None,
            regions: None,
            ignore_missing_zone: false,
        }
    }

    /// Set the answers
    pub fn with_answers(mut self, answers: Vec<Value>) -> Self {
        self.answers = answers;
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Option<u32>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the client-subnet toggle
    pub fn with_use_client_subnet(mut self, enabled: bool) -> Self {
        self.use_client_subnet = Some(enabled);
        self
    }

    /// Set record metadata
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Set the link target
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the filter chain
    pub fn with_filters(mut self, filters: Vec<Value>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Set region definitions
    pub fn with_regions(mut self, regions: Map<String, Value>) -> Self {
        self.regions = Some(regions);
        self
    }

    /// Tolerate a missing zone when deleting
    pub fn with_ignore_missing_zone(mut self, ignore: bool) -> Self {
        self.ignore_missing_zone = ignore;
        self
    }

    /// Fully qualified domain of the record
    ///
    /// Names already ending in the zone are kept as-is.
    pub fn fqdn(&self) -> String {
        let zone = self.zone.trim_end_matches('.');
        let name = self.name.trim_end_matches('.');
        if name == zone || name.ends_with(&format!(".{}", zone)) {
            name.to_string()
        } else {
            format!("{}.{}", name, zone)
        }
    }

    /// The desired value of a comparable field as JSON
    ///
    /// Returns `None` for unset optionals and unknown field names.
    pub fn field(&self, field: &str) -> Option<Value> {
        match field {
            "use_client_subnet" => self.use_client_subnet.map(Value::Bool),
            "meta" => self.meta.clone().map(Value::Object),
            "link" => self.link.clone().map(Value::String),
            "filters" => self.filters.clone().map(Value::Array),
            "ttl" => self.ttl.map(Value::from),
            "regions" => self.regions.clone().map(Value::Object),
            "answers" => Some(Value::Array(self.answers.clone())),
            _ => None,
        }
    }
}

/// A provider's handle for a zone
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// Zone name
    pub name: String,
    /// Raw provider representation
    pub data: Value,
}

impl Zone {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Read-only snapshot of a record as the provider returned it
///
/// Identity fields are kept in `data`; comparisons work on a sanitized copy.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRecord {
    /// Provider-assigned record id
    pub id: String,
    /// Full raw record
    pub data: Value,
}

impl RemoteRecord {
    /// Build a snapshot from a raw record, reading `id` from its top level
    pub fn from_data(data: Value) -> Result<Self> {
        let id = data
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed_record("record has no string 'id'"))?
            .to_string();
        Ok(Self { id, data })
    }

    /// The record's own `domain` and `type`, used to address it for
    /// updates and deletes
    pub fn locator(&self) -> Result<(&str, RecordType)> {
        let domain = self
            .data
            .get("domain")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::malformed_record(format!("record {} has no 'domain'", self.id))
            })?;
        let record_type = self
            .data
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::malformed_record(format!("record {} has no 'type'", self.id))
            })?;
        let record_type = record_type.parse::<RecordType>().map_err(|_| {
            Error::malformed_record(format!(
                "record {} has unsupported type '{}'",
                self.id, record_type
            ))
        })?;
        Ok((domain, record_type))
    }
}
