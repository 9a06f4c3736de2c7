//! Startup logging: configuration sources, providers and endpoints

use crate::config::{ConfigResolution, ValidationResult};
use crate::providers::{ProviderLoadSummary, ProviderRegistry};
use tracing::{info, warn};

/// Startup logger for configuration and provider information
pub struct StartupLogger;

impl StartupLogger {
    /// Banner plus configuration sources
    pub fn display_startup_info(resolution: &ConfigResolution, version: &str) {
        info!("utcp-discovery v{} starting...", version);
        info!("");

        Self::display_configuration_resolution(resolution);

        if resolution.env_overrides.has_overrides() {
            Self::display_environment_overrides(resolution);
        }

        Self::display_provider_sources(resolution);
    }

    fn display_configuration_resolution(resolution: &ConfigResolution) {
        info!("Configuration Resolution:");

        match &resolution.config_path {
            Some(path) => info!("   Config file: {:?}", path),
            None => info!("   Config file: none found, using environment and defaults"),
        }

        let server = &resolution.config.server;
        info!("   Environment: {}", server.environment);
        info!("   Log level: {} ({})", server.log_level, server.log_format);
        info!("");
    }

    fn display_environment_overrides(resolution: &ConfigResolution) {
        info!("Environment Overrides:");
        for override_info in resolution.env_overrides.get_override_summary() {
            info!("   {}", override_info);
        }
        info!("");
    }

    fn display_provider_sources(resolution: &ConfigResolution) {
        info!("Provider Sources:");

        if resolution.env_providers.is_empty() && resolution.file_providers.is_empty() {
            warn!("   No providers configured");
        }
        if !resolution.env_providers.is_empty() {
            info!("   From environment: {}", resolution.env_providers.join(", "));
        }
        if !resolution.file_providers.is_empty() {
            info!("   From config file: {}", resolution.file_providers.join(", "));
        }
        for name in &resolution.shadowed_file_providers {
            warn!(
                "   Config file entry '{}' ignored, environment defines a provider with the same name",
                name
            );
        }
        info!("");
    }

    /// Advisory findings from the configuration review
    pub fn display_validation_results(result: &ValidationResult) {
        if !result.has_issues() {
            return;
        }

        info!("Configuration Review:");
        for error in &result.errors {
            warn!("   error: {}", error);
        }
        for warning in &result.warnings {
            warn!("   {}", warning);
        }
        for suggestion in &result.suggestions {
            info!("   suggestion: {}", suggestion);
        }
        info!("");
    }

    /// Provider load results and the registry contents
    pub fn display_provider_status(summary: &ProviderLoadSummary, registry: &ProviderRegistry) {
        info!("Providers:");
        info!("   Registered types: {}", registry.provider_types().join(", "));

        for provider in registry.get_all_providers() {
            info!(
                "   {} ({}) {}",
                provider.name(),
                provider.provider_type(),
                if provider.is_enabled() { "enabled" } else { "disabled" }
            );
        }
        for (name, error) in &summary.failed {
            warn!("   {} failed to load: {}", name, error);
        }

        let aggregation = registry.aggregate_tools();
        info!("   Tools published: {}", aggregation.tools.len());
        info!("");
    }

    /// Endpoints served once the listener is up
    pub fn display_endpoints(host: &str, port: &str) {
        info!("Endpoints:");
        info!("   Manual:    http://{}:{}/utcp", host, port);
        info!("   Providers: http://{}:{}/providers", host, port);
        info!("   Health:    http://{}:{}/health", host, port);
        info!("");
    }
}
