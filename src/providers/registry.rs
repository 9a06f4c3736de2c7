//! Provider factory registry
//!
//! Maps provider type tags to factories and instance names to live
//! providers. One reader/writer lock guards both maps; factories and
//! `list_capabilities` always run with the lock released.

use crate::config::ProviderConfig;
use crate::error::{DiscoveryError, Result};
use crate::manual::Tool;
use crate::providers::provider::{Provider, ProviderFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

#[derive(Default)]
struct RegistryState {
    factories: HashMap<String, ProviderFactory>,
    /// Instances in creation order; a recreated name keeps its slot
    instances: Vec<(String, Arc<dyn Provider>)>,
}

impl RegistryState {
    fn position(&self, name: &str) -> Option<usize> {
        self.instances.iter().position(|(n, _)| n == name)
    }
}

/// A provider whose tool listing failed during aggregation
#[derive(Debug)]
pub struct ToolListingFailure {
    pub provider: String,
    pub error: DiscoveryError,
}

/// Result of aggregating tools across enabled providers
#[derive(Debug, Default)]
pub struct ToolAggregation {
    /// Tools in provider creation order, then each provider's emission order
    pub tools: Vec<Tool>,
    /// Providers skipped because their listing failed
    pub failures: Vec<ToolListingFailure>,
}

/// Thread-safe registry of provider factories and instances
#[derive(Default)]
pub struct ProviderRegistry {
    state: RwLock<RegistryState>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a factory under a type tag
    ///
    /// Factories are append-only: a second registration for the same tag
    /// fails and the original stays in place.
    pub fn register_factory<T: Into<String>>(
        &self,
        provider_type: T,
        factory: ProviderFactory,
    ) -> Result<()> {
        let provider_type = provider_type.into();
        let mut state = self.write();

        if state.factories.contains_key(&provider_type) {
            return Err(DiscoveryError::config(format!(
                "provider factory already registered for type: {}",
                provider_type
            )));
        }

        debug!(provider_type = %provider_type, "Registered provider factory");
        state.factories.insert(provider_type, factory);
        Ok(())
    }

    /// Build a provider with the factory for `provider_type` and store it as `name`
    ///
    /// An existing instance with the same name is replaced. On failure the
    /// instance map is left untouched.
    pub fn create_provider(
        &self,
        name: &str,
        provider_type: &str,
        mut config: ProviderConfig,
    ) -> Result<Arc<dyn Provider>> {
        let factory = {
            let state = self.read();
            state
                .factories
                .get(provider_type)
                .cloned()
                .ok_or_else(|| DiscoveryError::unknown_provider_type(provider_type))?
        };

        config.name = name.to_string();
        let provider = factory(config).map_err(|e| {
            DiscoveryError::wrap_provider(name, format!("failed to create provider {}", name), e)
        })?;

        let mut state = self.write();
        match state.position(name) {
            Some(index) => {
                debug!(provider = %name, "Replacing existing provider instance");
                state.instances[index].1 = Arc::clone(&provider);
            }
            None => state.instances.push((name.to_string(), Arc::clone(&provider))),
        }

        info!(provider = %name, provider_type = %provider_type, "Provider created");
        Ok(provider)
    }

    /// Look up an instance by name
    pub fn get_provider(&self, name: &str) -> Option<Arc<dyn Provider>> {
        let state = self.read();
        state
            .position(name)
            .map(|index| Arc::clone(&state.instances[index].1))
    }

    /// Snapshot of every instance, in creation order
    pub fn get_all_providers(&self) -> Vec<Arc<dyn Provider>> {
        self.read()
            .instances
            .iter()
            .map(|(_, provider)| Arc::clone(provider))
            .collect()
    }

    /// Snapshot of the instances currently reporting enabled
    pub fn get_enabled_providers(&self) -> Vec<Arc<dyn Provider>> {
        self.read()
            .instances
            .iter()
            .filter(|(_, provider)| provider.is_enabled())
            .map(|(_, provider)| Arc::clone(provider))
            .collect()
    }

    /// Tools from every enabled provider
    ///
    /// A provider whose listing fails is logged and skipped; use
    /// [`aggregate_tools`](Self::aggregate_tools) to see the failures.
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.aggregate_tools().tools
    }

    /// Collect tools from every enabled provider along with listing failures
    pub fn aggregate_tools(&self) -> ToolAggregation {
        let providers = self.get_enabled_providers();
        let mut aggregation = ToolAggregation::default();

        for provider in providers {
            match provider.list_capabilities() {
                Ok(tools) => {
                    debug!(provider = %provider.name(), count = tools.len(), "Listed tools");
                    aggregation.tools.extend(tools);
                }
                Err(error) => {
                    warn!(provider = %provider.name(), error = %error, "Skipping provider, tool listing failed");
                    aggregation.failures.push(ToolListingFailure {
                        provider: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        aggregation
    }

    /// Remove every instance; registered factories are kept
    pub fn clear(&self) {
        let mut state = self.write();
        state.instances.clear();
        debug!("Cleared provider instances");
    }

    /// Registered type tags, sorted
    pub fn provider_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.read().factories.keys().cloned().collect();
        types.sort();
        types
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.read().instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().instances.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        let names: Vec<&str> = state.instances.iter().map(|(n, _)| n.as_str()).collect();
        let mut types: Vec<&str> = state.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("factories", &types)
            .field("instances", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthDescriptor;
    use crate::error::ErrorKind;
    use crate::manual::{AuthPlaceholder, ToolProvider};
    use crate::providers::provider::{HasProviderBase, ProviderBase};

    struct StaticProvider {
        base: ProviderBase,
        tools: Vec<&'static str>,
        fail: bool,
    }

    impl HasProviderBase for StaticProvider {
        fn base(&self) -> &ProviderBase {
            &self.base
        }

        fn list_capabilities(&self) -> Result<Vec<Tool>> {
            if self.fail {
                return Err(DiscoveryError::provider(self.base.name(), "listing failed"));
            }
            Ok(self
                .tools
                .iter()
                .map(|name| {
                    Tool::new(
                        *name,
                        "test tool",
                        ToolProvider::http(
                            self.base.name(),
                            "https://example.com",
                            "GET",
                            AuthPlaceholder::api_key("TEST_KEY", "X-Key"),
                        ),
                    )
                })
                .collect())
        }
    }

    fn static_factory(tools: Vec<&'static str>) -> ProviderFactory {
        Arc::new(move |config: ProviderConfig| -> Result<Arc<dyn Provider>> {
            Ok(Arc::new(StaticProvider {
                base: ProviderBase::from_config(&config),
                tools: tools.clone(),
                fail: false,
            }) as Arc<dyn Provider>)
        })
    }

    fn failing_listing_factory() -> ProviderFactory {
        Arc::new(|config: ProviderConfig| -> Result<Arc<dyn Provider>> {
            Ok(Arc::new(StaticProvider {
                base: ProviderBase::from_config(&config),
                tools: Vec::new(),
                fail: true,
            }) as Arc<dyn Provider>)
        })
    }

    fn rejecting_factory() -> ProviderFactory {
        Arc::new(|_config: ProviderConfig| -> Result<Arc<dyn Provider>> {
            Err(DiscoveryError::validation("bad credentials"))
        })
    }

    fn config(enabled: bool) -> ProviderConfig {
        let mut config = ProviderConfig::new(
            "ignored",
            "static",
            "https://example.com",
            AuthDescriptor::api_key("k", "X-Key"),
        );
        config.enabled = enabled;
        config
    }

    #[test]
    fn test_duplicate_factory_is_rejected_and_original_kept() {
        let registry = ProviderRegistry::new();
        registry
            .register_factory("static", static_factory(vec!["original"]))
            .unwrap();

        let err = registry
            .register_factory("static", static_factory(vec!["replacement"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        registry.create_provider("p", "static", config(true)).unwrap();
        let names: Vec<String> = registry.get_all_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["original"]);
    }

    #[test]
    fn test_unknown_type_leaves_instances_untouched() {
        let registry = ProviderRegistry::new();
        let err = registry
            .create_provider("ghost", "nope", config(true))
            .err()
            .unwrap();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("unknown provider type: nope"));
        assert!(registry.get_provider("ghost").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_factory_failure_is_wrapped_with_instance_name() {
        let registry = ProviderRegistry::new();
        registry.register_factory("static", static_factory(vec!["a"])).unwrap();
        registry.register_factory("broken", rejecting_factory()).unwrap();
        registry.create_provider("good", "static", config(true)).unwrap();

        let err = registry
            .create_provider("good", "broken", config(true))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(err.provider_name(), Some("good"));
        assert!(err.to_string().contains("bad credentials"));

        // Prior instance survives a failed recreate
        let existing = registry.get_provider("good").unwrap();
        assert_eq!(existing.provider_type(), "static");
    }

    #[test]
    fn test_create_injects_name_and_lookup_misses_other_names() {
        let registry = ProviderRegistry::new();
        registry.register_factory("static", static_factory(vec![])).unwrap();

        let created = registry.create_provider("alpha", "static", config(true)).unwrap();
        assert_eq!(created.name(), "alpha");

        assert!(registry.get_provider("alpha").is_some());
        assert!(registry.get_provider("beta").is_none());
    }

    #[test]
    fn test_recreate_overwrites_and_keeps_order() {
        let registry = ProviderRegistry::new();
        registry.register_factory("static", static_factory(vec!["s"])).unwrap();
        registry.register_factory("other", static_factory(vec!["o"])).unwrap();

        registry.create_provider("first", "static", config(true)).unwrap();
        registry.create_provider("second", "static", config(true)).unwrap();
        registry.create_provider("first", "other", config(true)).unwrap();

        assert_eq!(registry.len(), 2);
        let providers = registry.get_all_providers();
        assert_eq!(providers[0].name(), "first");
        assert_eq!(providers[0].provider_type(), "other");
        assert_eq!(providers[1].name(), "second");
    }

    #[test]
    fn test_enabled_subset_and_tool_order() {
        let registry = ProviderRegistry::new();
        registry.register_factory("one", static_factory(vec!["a1", "a2"])).unwrap();
        registry.register_factory("two", static_factory(vec!["b1"])).unwrap();

        registry.create_provider("a", "one", config(true)).unwrap();
        registry.create_provider("off", "one", config(false)).unwrap();
        registry.create_provider("b", "two", config(true)).unwrap();

        let all = registry.get_all_providers();
        let enabled = registry.get_enabled_providers();
        let expected: Vec<&str> = all
            .iter()
            .filter(|p| p.is_enabled())
            .map(|p| p.name())
            .collect();
        let actual: Vec<&str> = enabled.iter().map(|p| p.name()).collect();
        assert_eq!(actual, expected);
        assert_eq!(actual, vec!["a", "b"]);

        let names: Vec<String> = registry.get_all_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_enabled_filter_reads_live_state() {
        let registry = ProviderRegistry::new();
        registry.register_factory("one", static_factory(vec!["a1", "a2"])).unwrap();
        registry.register_factory("two", static_factory(vec!["b1"])).unwrap();

        let a = registry.create_provider("a", "one", config(true)).unwrap();
        registry.create_provider("b", "two", config(true)).unwrap();
        assert_eq!(registry.get_all_tools().len(), 3);

        a.set_enabled(false);

        let enabled: Vec<String> = registry
            .get_enabled_providers()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(enabled, vec!["b"]);
        let names: Vec<String> = registry.get_all_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["b1"]);
        assert_eq!(registry.len(), 2);

        registry.get_provider("a").unwrap().set_enabled(true);
        let names: Vec<String> = registry.get_all_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_duplicate_tool_names_are_kept() {
        let registry = ProviderRegistry::new();
        registry.register_factory("static", static_factory(vec!["same"])).unwrap();
        registry.create_provider("x", "static", config(true)).unwrap();
        registry.create_provider("y", "static", config(true)).unwrap();

        assert_eq!(registry.get_all_tools().len(), 2);
    }

    #[test]
    fn test_listing_failure_is_skipped_and_reported() {
        let registry = ProviderRegistry::new();
        registry.register_factory("static", static_factory(vec!["ok"])).unwrap();
        registry.register_factory("flaky", failing_listing_factory()).unwrap();
        registry.create_provider("bad", "flaky", config(true)).unwrap();
        registry.create_provider("good", "static", config(true)).unwrap();

        let aggregation = registry.aggregate_tools();
        assert_eq!(aggregation.tools.len(), 1);
        assert_eq!(aggregation.failures.len(), 1);
        assert_eq!(aggregation.failures[0].provider, "bad");

        assert_eq!(registry.get_all_tools().len(), 1);
    }

    #[test]
    fn test_clear_keeps_factories() {
        let registry = ProviderRegistry::new();
        registry.register_factory("static", static_factory(vec![])).unwrap();
        registry.create_provider("p", "static", config(true)).unwrap();

        registry.clear();
        assert!(registry.get_all_providers().is_empty());
        assert!(registry.get_provider("p").is_none());
        assert!(registry.register_factory("static", static_factory(vec![])).is_err());
        assert_eq!(registry.provider_types(), vec!["static".to_string()]);

        registry.create_provider("p", "static", config(true)).unwrap();
        assert_eq!(registry.len(), 1);
    }
}
