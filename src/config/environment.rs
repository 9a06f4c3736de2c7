//! Environment variable integration for the discovery server

use crate::config::{AuthDescriptor, LogFormat, ProviderConfig, ServerConfig};
use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable names read at startup
pub struct EnvVars;

impl EnvVars {
    pub const PORT: &'static str = "PORT";
    pub const SERVER_PORT: &'static str = "UTCP_SERVER_PORT";
    pub const SERVER_HOST: &'static str = "UTCP_SERVER_HOST";
    pub const SERVER_ENVIRONMENT: &'static str = "UTCP_SERVER_ENVIRONMENT";
    pub const SERVER_LOG_LEVEL: &'static str = "UTCP_SERVER_LOG_LEVEL";
    pub const SERVER_LOG_FORMAT: &'static str = "UTCP_SERVER_LOG_FORMAT";
    pub const CONFIG_PATH: &'static str = "UTCP_CONFIG_PATH";
    pub const ENV: &'static str = "UTCP_ENV";

    pub const JIRA_BASE_URL: &'static str = "JIRA_BASE_URL";
    pub const JIRA_USERNAME: &'static str = "JIRA_USERNAME";
    pub const JIRA_PASSWORD: &'static str = "JIRA_PASSWORD";
    pub const WIKI_BASE_URL: &'static str = "WIKI_BASE_URL";
    pub const WIKI_API_KEY: &'static str = "WIKI_API_KEY";
    pub const GITLAB_BASE_URL: &'static str = "GITLAB_BASE_URL";
    pub const GITLAB_TOKEN: &'static str = "GITLAB_TOKEN";
}

/// Read a variable, treating an empty value as unset
pub fn env_value<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.is_empty())
}

/// Lookup backed by the process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Server setting overrides taken from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvironmentOverrides {
    pub port: Option<String>,
    pub host: Option<String>,
    pub environment: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub config_path: Option<PathBuf>,
}

impl EnvironmentOverrides {
    /// Collect overrides; `PORT` wins over `UTCP_SERVER_PORT`
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = env_value(lookup, EnvVars::PORT)
            .or_else(|| env_value(lookup, EnvVars::SERVER_PORT));

        let log_format = match env_value(lookup, EnvVars::SERVER_LOG_FORMAT) {
            Some(raw) => Some(raw.parse::<LogFormat>()?),
            None => None,
        };

        Ok(Self {
            port,
            host: env_value(lookup, EnvVars::SERVER_HOST),
            environment: env_value(lookup, EnvVars::SERVER_ENVIRONMENT),
            log_level: env_value(lookup, EnvVars::SERVER_LOG_LEVEL),
            log_format,
            config_path: env_value(lookup, EnvVars::CONFIG_PATH).map(PathBuf::from),
        })
    }

    /// Apply overrides on top of file or default server settings
    pub fn apply_to_server(&self, server: &mut ServerConfig) {
        if let Some(ref port) = self.port {
            debug!("Environment override: server.port={}", port);
            server.port = port.clone();
        }
        if let Some(ref host) = self.host {
            debug!("Environment override: server.host={}", host);
            server.host = host.clone();
        }
        if let Some(ref environment) = self.environment {
            server.environment = environment.clone();
        }
        if let Some(ref log_level) = self.log_level {
            server.log_level = log_level.clone();
        }
        if let Some(log_format) = self.log_format {
            server.log_format = log_format;
        }
    }

    /// Check if any environment overrides are active
    pub fn has_overrides(&self) -> bool {
        self.port.is_some()
            || self.host.is_some()
            || self.environment.is_some()
            || self.log_level.is_some()
            || self.log_format.is_some()
            || self.config_path.is_some()
    }

    /// Get summary of active overrides for logging
    pub fn get_override_summary(&self) -> Vec<String> {
        let mut summary = Vec::new();

        if let Some(ref port) = self.port {
            summary.push(format!("server.port={}", port));
        }
        if let Some(ref host) = self.host {
            summary.push(format!("{}={}", EnvVars::SERVER_HOST, host));
        }
        if let Some(ref environment) = self.environment {
            summary.push(format!("{}={}", EnvVars::SERVER_ENVIRONMENT, environment));
        }
        if let Some(ref log_level) = self.log_level {
            summary.push(format!("{}={}", EnvVars::SERVER_LOG_LEVEL, log_level));
        }
        if let Some(log_format) = self.log_format {
            summary.push(format!("{}={}", EnvVars::SERVER_LOG_FORMAT, log_format));
        }
        if let Some(ref path) = self.config_path {
            summary.push(format!("{}={:?}", EnvVars::CONFIG_PATH, path));
        }

        summary
    }
}

/// Providers declared through well-known environment variables
///
/// An integration is configured when its base URL variable is set. The
/// credential variables are copied as-is; validation reports them if empty.
pub fn providers_from_env<F>(lookup: &F) -> Vec<ProviderConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut providers = Vec::new();
    let var = |key: &str| env_value(lookup, key).unwrap_or_default();

    if let Some(base_url) = env_value(lookup, EnvVars::JIRA_BASE_URL) {
        providers.push(ProviderConfig::new(
            "jira",
            "jira",
            base_url,
            AuthDescriptor::basic(var(EnvVars::JIRA_USERNAME), var(EnvVars::JIRA_PASSWORD)),
        ));
    }

    if let Some(base_url) = env_value(lookup, EnvVars::WIKI_BASE_URL) {
        providers.push(ProviderConfig::new(
            "wiki",
            "confluence",
            base_url,
            AuthDescriptor::api_key(var(EnvVars::WIKI_API_KEY), "Authorization"),
        ));
    }

    if let Some(base_url) = env_value(lookup, EnvVars::GITLAB_BASE_URL) {
        providers.push(ProviderConfig::new(
            "gitlab",
            "gitlab",
            base_url,
            AuthDescriptor::personal_token(var(EnvVars::GITLAB_TOKEN), "PRIVATE-TOKEN"),
        ));
    }

    providers
}

/// Load .env files in order of precedence
///
/// `.env`, then `.env.{environment}`, then `.env.local`. Variables already
/// present in the process environment are never overwritten.
pub fn load_env_files() {
    let env = std::env::var(EnvVars::ENV)
        .or_else(|_| std::env::var("ENV"))
        .unwrap_or_else(|_| "development".to_string());

    let env_specific_file = format!(".env.{}", env);
    let env_files = [".env", env_specific_file.as_str(), ".env.local"];

    for env_file in env_files {
        match dotenvy::from_filename(env_file) {
            Ok(_) => info!("Loaded environment variables from {}", env_file),
            Err(e) if e.not_found() => debug!("No {} file found, skipping", env_file),
            Err(e) => tracing::warn!("Failed to load {}: {}", env_file, e),
        }
    }
}
