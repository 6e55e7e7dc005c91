// # NS1 Record Provider
//
// This crate provides an NS1 REST API implementation of `RecordProvider`.
//
// ## Behavior
//
// - One HTTP request per trait method
// - Full error propagation to the reconciler (no retry, no backoff)
// - HTTP timeout configured (30 seconds)
// - 404 maps to `Error::NotFound`; every other non-2xx status maps to
//   `Error::Provider { code, message }` with the API's message
// - Type-specific create endpoints selected from the typed `RecordType`
//
// ## Security Requirements
//
// - API key NEVER appears in logs or `Debug` output
// - Provider creation fails fast if the key is empty
//
// ## API Reference
//
// - Load zone:     GET    `/zones/:zone`
// - Load record:   GET    `/zones/:zone/:domain/:type`
// - Create record: PUT    `/zones/:zone/:domain/:type`
// - Update record: POST   `/zones/:zone/:domain/:type`
// - Delete record: DELETE `/zones/:zone/:domain/:type`

use async_trait::async_trait;
use dnsrec_core::config::ProviderConfig;
use dnsrec_core::model::{RecordType, RemoteRecord, Zone};
use dnsrec_core::provider::{NewRecord, RecordProvider, RecordProviderFactory};
use dnsrec_core::{Error, ProviderRegistry, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Public NS1 API base URL
pub const NS1_API_BASE: &str = "https://api.nsone.net/v1";

/// Header carrying the API key
const API_KEY_HEADER: &str = "X-NSONE-Key";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// NS1 provider
///
/// Isolated, stateless and single-shot: deciding whether a change is
/// needed (and dry-run) is owned by the `Reconciler`.
pub struct Ns1Provider {
    /// API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API base URL, without trailing slash
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for Ns1Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ns1Provider")
            .field("api_key", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl Ns1Provider {
    /// Create a new NS1 provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: NS1 API key with DNS record permissions
    /// - `endpoint`: Optional API base URL (defaults to [`NS1_API_BASE`])
    pub fn new(api_key: impl Into<String>, endpoint: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(api_key, endpoint, client)
    }

    /// Create a provider over a preconfigured HTTP client (proxies, TLS roots)
    pub fn with_client(
        api_key: impl Into<String>,
        endpoint: Option<String>,
        client: reqwest::Client,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("NS1 API key cannot be empty"));
        }

        let endpoint = endpoint
            .unwrap_or_else(|| NS1_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            endpoint,
            client,
        })
    }

    /// The API base URL in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn zone_url(&self, zone: &str) -> String {
        format!("{}/zones/{}", self.endpoint, zone)
    }

    fn record_url(&self, zone: &str, domain: &str, record_type: RecordType) -> String {
        format!(
            "{}/zones/{}/{}/{}",
            self.endpoint,
            zone,
            domain,
            record_type.as_str()
        )
    }

    /// URL of an already-loaded record, from its own `domain`/`type`
    fn existing_record_url(&self, zone: &Zone, record: &RemoteRecord) -> Result<String> {
        let (domain, record_type) = record.locator()?;
        Ok(self.record_url(&zone.name, domain, record_type))
    }

    /// Send a request and return the JSON body of a 2xx response
    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<Value> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            tracing::debug!("NS1 request for {} failed with status {}", what, status);
            return Err(error_from_status(status.as_u16(), &text, what));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        parse_body(status.as_u16(), &text)
    }
}

/// Parse the JSON body of a 2xx response; an empty body is `null`
fn parse_body(code: u16, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
        .map_err(|e| Error::provider(code, format!("Failed to parse response: {}", e)))
}

/// Map a non-2xx response to an error
///
/// The message comes from the body's `message` field when present,
/// otherwise the raw body.
fn error_from_status(code: u16, body: &str, what: &str) -> Error {
    if code == 404 {
        return Error::not_found(what);
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        format!("{} request failed", what)
    } else {
        message
    };
    Error::provider(code, message)
}

#[async_trait]
impl RecordProvider for Ns1Provider {
    async fn load_zone(&self, zone: &str) -> Result<Zone> {
        let url = self.zone_url(zone);
        tracing::debug!("Loading zone: GET {}", url);

        let data = self
            .send(self.client.get(&url), &format!("zone {}", zone))
            .await?;
        Ok(Zone::new(zone, data))
    }

    async fn load_record(
        &self,
        zone: &Zone,
        domain: &str,
        record_type: RecordType,
    ) -> Result<RemoteRecord> {
        let url = self.record_url(&zone.name, domain, record_type);
        tracing::debug!("Loading record: GET {}", url);

        let data = self
            .send(
                self.client.get(&url),
                &format!("record {} ({})", domain, record_type),
            )
            .await?;
        RemoteRecord::from_data(data)
    }

    async fn create_record(&self, zone: &Zone, record: NewRecord) -> Result<RemoteRecord> {
        let url = self.record_url(&zone.name, &record.domain, record.record_type);
        let body = record.body(&zone.name);
        tracing::debug!("Creating record: PUT {}", url);

        let data = self
            .send(
                self.client.put(&url).json(&body),
                &format!("record {} ({})", record.domain, record.record_type),
            )
            .await?;
        RemoteRecord::from_data(data)
    }

    async fn update_record(
        &self,
        zone: &Zone,
        record: &RemoteRecord,
        fields: Map<String, Value>,
    ) -> Result<RemoteRecord> {
        let url = self.existing_record_url(zone, record)?;
        tracing::debug!("Updating record {}: POST {}", record.id, url);

        let data = self
            .send(
                self.client.post(&url).json(&Value::Object(fields)),
                &format!("record {}", record.id),
            )
            .await?;
        RemoteRecord::from_data(data)
    }

    async fn delete_record(&self, zone: &Zone, record: &RemoteRecord) -> Result<()> {
        let url = self.existing_record_url(zone, record)?;
        tracing::debug!("Deleting record {}: DELETE {}", record.id, url);

        self.send(self.client.delete(&url), &format!("record {}", record.id))
            .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "ns1"
    }
}

/// Factory for creating NS1 providers
pub struct Ns1Factory;

impl RecordProviderFactory for Ns1Factory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
        match config {
            ProviderConfig::Ns1 { api_key, endpoint } => {
                if api_key.is_empty() {
                    return Err(Error::config("NS1 API key is required"));
                }
                Ok(Box::new(Ns1Provider::new(api_key.clone(), endpoint.clone())?))
            }
            _ => Err(Error::config("Invalid config for NS1 provider")),
        }
    }
}

/// Register the NS1 provider with a registry
///
/// # Example
///
/// ```rust
/// use dnsrec_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// dnsrec_provider_ns1::register(&registry);
/// assert!(registry.has_provider("ns1"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider("ns1", Box::new(Ns1Factory));
}
