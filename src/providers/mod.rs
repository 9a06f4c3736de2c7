//! Providers: the integration abstraction, the factory registry and the
//! built-in Jira, Confluence and GitLab catalogs.

pub mod gitlab;
pub mod jira;
pub mod provider;
pub mod registry;
pub mod wiki;

pub use gitlab::GitLabProvider;
pub use jira::JiraProvider;
pub use provider::{HasProviderBase, Provider, ProviderBase, ProviderFactory};
pub use registry::{ProviderRegistry, ToolAggregation, ToolListingFailure};
pub use wiki::WikiProvider;

use crate::config::{Config, ProviderConfig};
use crate::error::{DiscoveryError, Result};
use std::sync::Arc;
use tracing::{error, info};

/// Register the Jira, Confluence and GitLab factories
pub fn register_builtin_factories(registry: &ProviderRegistry) -> Result<()> {
    registry.register_factory(jira::PROVIDER_TYPE, Arc::new(JiraProvider::create))?;
    registry.register_factory(wiki::PROVIDER_TYPE, Arc::new(WikiProvider::create))?;
    registry.register_factory(gitlab::PROVIDER_TYPE, Arc::new(GitLabProvider::create))?;
    Ok(())
}

/// Outcome of instantiating every configured provider
#[derive(Debug, Default)]
pub struct ProviderLoadSummary {
    /// Instances created, in configuration order
    pub loaded: Vec<String>,
    /// Instances whose creation failed
    pub failed: Vec<(String, DiscoveryError)>,
}

impl ProviderLoadSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create one registry instance per configured provider
///
/// A failing provider is logged and recorded; the rest still load.
pub fn load_providers(registry: &ProviderRegistry, config: &Config) -> ProviderLoadSummary {
    let mut summary = ProviderLoadSummary::default();

    for provider in &config.providers {
        match registry.create_provider(&provider.name, &provider.provider_type, provider.clone()) {
            Ok(_) => summary.loaded.push(provider.name.clone()),
            Err(e) => {
                error!(provider = %provider.name, error = %e, "Failed to create provider");
                summary.failed.push((provider.name.clone(), e));
            }
        }
    }

    info!(
        loaded = summary.loaded.len(),
        failed = summary.failed.len(),
        "Provider loading complete"
    );
    summary
}

/// Base URL check shared by the built-in factories
fn require_base_url(config: &ProviderConfig) -> Result<()> {
    if config.base_url.trim().is_empty() {
        return Err(DiscoveryError::validation(format!(
            "base_url is required for {} provider",
            config.provider_type
        )));
    }
    Ok(())
}

/// Error for a provider configured with the wrong auth variant
fn wrong_auth(config: &ProviderConfig, expected: &str) -> DiscoveryError {
    DiscoveryError::validation(format!(
        "{} provider requires {} auth, got {}",
        config.provider_type,
        expected,
        config.auth.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthDescriptor, ServerConfig};
    use crate::error::ErrorKind;

    fn sample_config() -> Config {
        Config {
            server: ServerConfig::default(),
            providers: vec![
                ProviderConfig::new(
                    "jira",
                    "jira",
                    "https://jira.example.com",
                    AuthDescriptor::basic("u", "p"),
                ),
                ProviderConfig::new(
                    "wiki",
                    "confluence",
                    "https://wiki.example.com",
                    AuthDescriptor::api_key("k", "Authorization"),
                ),
                ProviderConfig::new(
                    "gitlab",
                    "gitlab",
                    "https://gitlab.example.com",
                    AuthDescriptor::personal_token("t", "PRIVATE-TOKEN"),
                ),
            ],
        }
    }

    #[test]
    fn test_builtin_factories_register_once() {
        let registry = ProviderRegistry::new();
        register_builtin_factories(&registry).unwrap();
        assert_eq!(
            registry.provider_types(),
            vec!["confluence".to_string(), "gitlab".to_string(), "jira".to_string()]
        );

        let err = register_builtin_factories(&registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_load_all_builtin_providers() {
        let registry = ProviderRegistry::new();
        register_builtin_factories(&registry).unwrap();

        let summary = load_providers(&registry, &sample_config());
        assert!(summary.is_complete());
        assert_eq!(summary.loaded, vec!["jira", "wiki", "gitlab"]);

        let tools = registry.get_all_tools();
        assert_eq!(tools.len(), 7 + 8 + 10);
        assert_eq!(tools[0].name, "jira_search_issues");
        assert_eq!(tools[7].name, "wiki_search_pages");
        assert_eq!(tools[15].name, "gitlab_search_projects");
    }

    #[test]
    fn test_one_bad_provider_does_not_block_the_rest() {
        let registry = ProviderRegistry::new();
        register_builtin_factories(&registry).unwrap();

        let mut config = sample_config();
        config.providers[0].auth = AuthDescriptor::api_key("k", "X-Key");
        config.providers.push(ProviderConfig::new(
            "tracker",
            "redmine",
            "https://redmine.example.com",
            AuthDescriptor::None,
        ));

        let summary = load_providers(&registry, &config);
        assert_eq!(summary.loaded, vec!["wiki", "gitlab"]);
        assert_eq!(summary.failed.len(), 2);
        assert_eq!(summary.failed[0].0, "jira");
        assert_eq!(summary.failed[0].1.kind(), ErrorKind::Provider);
        assert_eq!(summary.failed[1].1.kind(), ErrorKind::NotFound);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_disabled_provider_is_created_but_publishes_nothing() {
        let registry = ProviderRegistry::new();
        register_builtin_factories(&registry).unwrap();

        let mut config = sample_config();
        config.providers.truncate(1);
        config.providers[0].enabled = false;

        let summary = load_providers(&registry, &config);
        assert_eq!(summary.loaded, vec!["jira"]);
        assert!(registry.get_enabled_providers().is_empty());
        assert!(registry.get_all_tools().is_empty());
    }
}
