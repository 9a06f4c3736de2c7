//! Configuration model for the discovery server

use crate::error::{DiscoveryError, Result};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Configured integrations, env-derived entries first
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to; kept as text so an empty value can be reported
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: String,
    /// Deployment environment name (development, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "loglevel")]
    pub log_level: String,
    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Resolve the socket address to bind
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let port: u16 = self.port.trim().parse().map_err(|e| {
            DiscoveryError::config(format!("Invalid server port '{}': {}", self.port, e))
        })?;

        format!("{}:{}", self.host, port).parse().map_err(|e| {
            DiscoveryError::config(format!(
                "Invalid bind address '{}:{}': {}",
                self.host, port, e
            ))
        })
    }
}

/// Accept the port as either a YAML string or a number
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Text(String),
        Number(u64),
    }

    Ok(match PortValue::deserialize(deserializer)? {
        PortValue::Text(text) => text,
        PortValue::Number(number) => number.to_string(),
    })
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(DiscoveryError::config(format!(
                "Invalid log format: {} (valid options: text, json)",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Configuration for a single integration instance
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Unique instance name
    #[serde(default)]
    pub name: String,
    /// Provider type tag used to select a factory (jira, confluence, gitlab)
    #[serde(rename = "type", default)]
    pub provider_type: String,
    /// Whether the instance publishes tools
    #[serde(default)]
    pub enabled: bool,
    /// Root URL of the downstream API
    #[serde(default, alias = "baseurl")]
    pub base_url: String,
    /// Credentials this service validates but never publishes
    #[serde(default)]
    pub auth: AuthDescriptor,
}

impl ProviderConfig {
    pub fn new<N, T, U>(name: N, provider_type: T, base_url: U, auth: AuthDescriptor) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            name: name.into(),
            provider_type: provider_type.into(),
            enabled: true,
            base_url: base_url.into(),
            auth,
        }
    }

    /// Validate this provider on its own
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(DiscoveryError::validation)
    }

    fn check(&self) -> std::result::Result<(), &'static str> {
        if self.name.is_empty() {
            return Err("provider name is required");
        }

        if self.provider_type.is_empty() {
            return Err("provider type is required");
        }

        if !self.enabled {
            return Ok(());
        }

        if self.base_url.is_empty() {
            return Err("base URL is required for enabled provider");
        }

        self.auth.check()
    }
}

/// Credentials for a downstream system, tagged by `type`
///
/// Missing fields deserialize as empty strings so they surface as
/// validation failures instead of parse failures. Secret fields stay
/// wrapped and only `check` reads them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDescriptor {
    /// No credentials
    #[default]
    None,
    Basic {
        #[serde(default)]
        username: String,
        #[serde(default = "empty_secret")]
        password: Secret<String>,
    },
    ApiKey {
        #[serde(default = "empty_secret", alias = "api_key")]
        key: Secret<String>,
        /// Header or query parameter carrying the key
        #[serde(default)]
        location: String,
    },
    PersonalToken {
        #[serde(default = "empty_secret")]
        token: Secret<String>,
        #[serde(default)]
        header: String,
    },
    #[serde(rename = "oauth2")]
    OAuth2 {
        #[serde(default)]
        client_id: String,
        #[serde(default = "empty_secret")]
        client_secret: Secret<String>,
        #[serde(default)]
        token_url: String,
    },
}

impl AuthDescriptor {
    pub fn basic<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self::Basic {
            username: username.into(),
            password: Secret::new(password.into()),
        }
    }

    pub fn api_key<K: Into<String>, L: Into<String>>(key: K, location: L) -> Self {
        Self::ApiKey {
            key: Secret::new(key.into()),
            location: location.into(),
        }
    }

    pub fn personal_token<T: Into<String>, H: Into<String>>(token: T, header: H) -> Self {
        Self::PersonalToken {
            token: Secret::new(token.into()),
            header: header.into(),
        }
    }

    pub fn oauth2<I, S, U>(client_id: I, client_secret: S, token_url: U) -> Self
    where
        I: Into<String>,
        S: Into<String>,
        U: Into<String>,
    {
        Self::OAuth2 {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
            token_url: token_url.into(),
        }
    }

    /// Wire tag of this variant
    pub fn kind(&self) -> &'static str {
        match self {
            AuthDescriptor::None => "none",
            AuthDescriptor::Basic { .. } => "basic",
            AuthDescriptor::ApiKey { .. } => "api_key",
            AuthDescriptor::PersonalToken { .. } => "personal_token",
            AuthDescriptor::OAuth2 { .. } => "oauth2",
        }
    }

    /// Check that the active variant's required fields are present
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(DiscoveryError::validation)
    }

    fn check(&self) -> std::result::Result<(), &'static str> {
        match self {
            AuthDescriptor::None => Ok(()),
            AuthDescriptor::Basic { username, password } => {
                if username.is_empty() || password.expose_secret().is_empty() {
                    return Err("username and password required for basic auth");
                }
                Ok(())
            }
            AuthDescriptor::ApiKey { key, .. } => {
                if key.expose_secret().is_empty() {
                    return Err("API key required for api_key auth");
                }
                Ok(())
            }
            AuthDescriptor::PersonalToken { token, .. } => {
                if token.expose_secret().is_empty() {
                    return Err("token required for personal_token auth");
                }
                Ok(())
            }
            AuthDescriptor::OAuth2 {
                client_id,
                client_secret,
                token_url,
            } => {
                if client_id.is_empty()
                    || client_secret.expose_secret().is_empty()
                    || token_url.is_empty()
                {
                    return Err("client_id, client_secret, and token_url required for oauth2 auth");
                }
                Ok(())
            }
        }
    }
}

impl Config {
    /// Validate the configuration
    ///
    /// Every provider is checked in order; the first failure is reported
    /// with the offending provider's name.
    pub fn validate(&self) -> Result<()> {
        if self.server.port.trim().is_empty() {
            return Err(DiscoveryError::validation("server port is required"));
        }

        for provider in &self.providers {
            if let Err(reason) = provider.check() {
                return Err(DiscoveryError::validation(format!(
                    "provider {}: {}",
                    provider.name, reason
                )));
            }
        }

        Ok(())
    }

    /// Find a provider configuration by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Names of the enabled providers, in configuration order
    pub fn enabled_provider_names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.name.as_str())
            .collect()
    }
}
