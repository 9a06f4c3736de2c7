//! Provider abstraction shared by every integration

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::manual::Tool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A named, typed, enable-able source of tools for one external system
///
/// Implementations must not call back into the registry from
/// `list_capabilities`.
pub trait Provider: Send + Sync {
    /// Tools this provider publishes, in emission order
    fn list_capabilities(&self) -> Result<Vec<Tool>>;

    /// Instance name
    fn name(&self) -> &str;

    /// Type tag the provider was built from
    fn provider_type(&self) -> &str;

    /// Live enabled state
    fn is_enabled(&self) -> bool;

    /// Toggle the live enabled state; readers see it on their next call
    fn set_enabled(&self, enabled: bool);
}

/// Constructor bound to a provider type tag
pub type ProviderFactory = Arc<dyn Fn(ProviderConfig) -> Result<Arc<dyn Provider>> + Send + Sync>;

/// Shared state for concrete providers
#[derive(Debug)]
pub struct ProviderBase {
    name: String,
    provider_type: String,
    base_url: String,
    enabled: AtomicBool,
}

impl ProviderBase {
    pub fn new<N, T, U>(name: N, provider_type: T, base_url: U, enabled: bool) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            name: name.into(),
            provider_type: provider_type.into(),
            base_url: base_url.into(),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Build from configuration, trimming a trailing `/` from the base URL
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            config.name.clone(),
            config.provider_type.clone(),
            config.base_url.trim_end_matches('/'),
            config.enabled,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Toggle the live enabled state
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

/// Integrations that keep their identity in a [`ProviderBase`]
///
/// Implementing this plus `list_capabilities` is enough to get [`Provider`].
pub trait HasProviderBase: Send + Sync {
    fn base(&self) -> &ProviderBase;

    fn list_capabilities(&self) -> Result<Vec<Tool>>;
}

impl<T: HasProviderBase> Provider for T {
    fn list_capabilities(&self) -> Result<Vec<Tool>> {
        HasProviderBase::list_capabilities(self)
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    fn provider_type(&self) -> &str {
        self.base().provider_type()
    }

    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    fn set_enabled(&self, enabled: bool) {
        self.base().set_enabled(enabled)
    }
}
