//! Plugin-based provider registry
//!
//! The registry allows record providers to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dnsrec_core::registry::ProviderRegistry;
//! use dnsrec_core::config::ProviderConfig;
//!
//! let registry = ProviderRegistry::with_builtin();
//! dnsrec_provider_ns1::register(&registry);
//!
//! let config = ProviderConfig::Ns1 { api_key: "...".into(), endpoint: None };
//! let provider = registry.create_provider(&config)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::provider::{MemoryProviderFactory, RecordProvider, RecordProviderFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry mapping provider type names to factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Box<dyn RecordProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the providers built into this crate (`memory`)
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_provider("memory", Box::new(MemoryProviderFactory));
        registry
    }

    /// Register a provider factory under `name`, replacing any previous one
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn RecordProviderFactory>,
    ) {
        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());
        providers.insert(name.into(), factory);
    }

    /// Create a provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RecordProvider>)`: Created provider instance
    /// - `Err(Error)`: If the provider type is not registered or creation fails
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
        config.validate()?;

        let provider_type = config.type_name();
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// All registered provider type names, sorted
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RefusingFactory;

    impl RecordProviderFactory for RefusingFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
            Err(Error::config("refusing factory"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        assert!(!registry.has_provider("refusing"));
        registry.register_provider("refusing", Box::new(RefusingFactory));
        assert!(registry.has_provider("refusing"));
        assert!(registry.list_providers().contains(&"refusing".to_string()));
    }

    #[test]
    fn test_builtin_memory_provider() {
        let registry = ProviderRegistry::with_builtin();
        assert_eq!(registry.list_providers(), vec!["memory".to_string()]);

        let provider = registry
            .create_provider(&ProviderConfig::Memory { zones: Vec::new() })
            .unwrap();
        assert_eq!(provider.provider_name(), "memory");
    }

    /// Memory provider seeded from an opaque `{"zones": [...]}` config
    struct SeededFactory;

    impl RecordProviderFactory for SeededFactory {
        fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
            let ProviderConfig::Custom { config, .. } = config else {
                return Err(Error::config("seeded factory needs a custom config"));
            };
            let zones: Vec<String> = serde_json::from_value(config["zones"].clone())?;
            MemoryProviderFactory.create(&ProviderConfig::Memory { zones })
        }
    }

    #[test]
    fn test_custom_config_resolves_by_factory_name() {
        let registry = ProviderRegistry::with_builtin();
        registry.register_provider("seeded", Box::new(SeededFactory));

        let config = ProviderConfig::Custom {
            factory: "seeded".to_string(),
            config: serde_json::json!({"zones": ["example.com"]}),
        };
        let provider = registry.create_provider(&config).unwrap();
        assert!(tokio_test::block_on(provider.load_zone("example.com")).is_ok());

        let null_config = ProviderConfig::Custom {
            factory: "seeded".to_string(),
            config: serde_json::Value::Null,
        };
        assert!(registry.create_provider(&null_config).err().unwrap().is_config());

        let unknown = ProviderConfig::Custom {
            factory: "route53".to_string(),
            config: serde_json::json!({}),
        };
        assert!(registry.create_provider(&unknown).err().unwrap().is_config());
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let registry = ProviderRegistry::new();
        let err = registry
            .create_provider(&ProviderConfig::Memory { zones: Vec::new() })
            .err()
            .unwrap();
        assert!(err.is_config());
    }
}
