//! Startup configuration review: hard errors plus advisory warnings

use crate::config::{AuthDescriptor, Config, ProviderConfig};
use std::collections::HashSet;
use tracing::debug;

/// Provider types with a built-in catalog
pub const KNOWN_PROVIDER_TYPES: &[&str] = &["jira", "confluence", "gitlab"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Review a resolved configuration
    ///
    /// `errors` holds the same failure `Config::validate` reports; warnings
    /// and suggestions never stop startup.
    pub fn validate(config: &Config) -> ValidationResult {
        debug!("Reviewing configuration");

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut suggestions = Vec::new();

        if let Err(e) = config.validate() {
            errors.push(e.to_string());
        }

        if config.server.host.trim().is_empty() {
            warnings.push("Server host is empty, binding may fail".to_string());
            suggestions.push(
                "Set server.host to '0.0.0.0' for all interfaces or '127.0.0.1' for localhost only"
                    .to_string(),
            );
        }

        // An empty port is already reported by `Config::validate`
        if !config.server.port.trim().is_empty() {
            match config.server.bind_address() {
                Ok(addr) if addr.port() != 0 && addr.port() < 1024 => {
                    warnings.push(
                        "Server port is in reserved range (<1024), may require root privileges"
                            .to_string(),
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    errors.push(e.to_string());
                    suggestions.push(
                        "Use an IP address for server.host and a number from 1 to 65535 for server.port"
                            .to_string(),
                    );
                }
            }
        }

        if config.enabled_provider_names().is_empty() {
            warnings.push("No enabled providers, the manual will contain no tools".to_string());
            suggestions.push(
                "Set JIRA_BASE_URL, WIKI_BASE_URL or GITLAB_BASE_URL, or add providers to config.yaml"
                    .to_string(),
            );
        }

        let mut seen = HashSet::new();
        for provider in &config.providers {
            if !seen.insert(provider.name.as_str()) {
                warnings.push(format!(
                    "Provider '{}' is declared more than once, the last entry replaces earlier ones",
                    provider.name
                ));
            }
            Self::review_provider(provider, &mut warnings, &mut suggestions);
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            suggestions,
        }
    }

    fn review_provider(
        provider: &ProviderConfig,
        warnings: &mut Vec<String>,
        suggestions: &mut Vec<String>,
    ) {
        if !KNOWN_PROVIDER_TYPES.contains(&provider.provider_type.as_str()) {
            warnings.push(format!(
                "Provider '{}' has type '{}' with no built-in catalog",
                provider.name, provider.provider_type
            ));
            suggestions.push(format!(
                "Use one of: {}",
                KNOWN_PROVIDER_TYPES.join(", ")
            ));
        }

        if !provider.enabled {
            return;
        }

        if !provider.base_url.is_empty() && url::Url::parse(&provider.base_url).is_err() {
            warnings.push(format!(
                "Provider '{}' base URL '{}' is not an absolute URL",
                provider.name, provider.base_url
            ));
        }

        if matches!(provider.auth, AuthDescriptor::None) {
            warnings.push(format!(
                "Provider '{}' has no auth configured, its factory will reject it",
                provider.name
            ));
        }
    }
}

/// Outcome of a configuration review
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// Whether there is anything to report
    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}
