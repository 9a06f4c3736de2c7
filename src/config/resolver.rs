//! Configuration resolution: config file discovery plus environment precedence

use crate::config::environment::{providers_from_env, EnvironmentOverrides};
use crate::config::Config;
use crate::error::{DiscoveryError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file name looked up in each search directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directories searched, in order, when no explicit path is given
pub const CONFIG_SEARCH_DIRS: &[&str] = &[".", "./config", "/etc/utcp-discovery"];

/// Where the configuration came from and what was merged
#[derive(Debug, Clone)]
pub struct ConfigResolution {
    /// Final merged configuration (not yet validated)
    pub config: Config,
    /// Config file that was read, if any
    pub config_path: Option<PathBuf>,
    /// Environment overrides that were applied to server settings
    pub env_overrides: EnvironmentOverrides,
    /// Providers declared by environment variables
    pub env_providers: Vec<String>,
    /// File providers that were appended
    pub file_providers: Vec<String>,
    /// File providers dropped because an env-derived entry has the same name
    pub shadowed_file_providers: Vec<String>,
}

/// Configuration resolver with priority system
pub struct ConfigResolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    lookup: F,
    env_overrides: EnvironmentOverrides,
}

impl<F> ConfigResolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Create a resolver reading variables through `lookup`
    pub fn new(lookup: F) -> Result<Self> {
        let env_overrides = EnvironmentOverrides::from_lookup(&lookup)?;
        Ok(Self {
            lookup,
            env_overrides,
        })
    }

    /// Resolve configuration: file (optional) < environment
    pub fn resolve(&self, cli_config_path: Option<&Path>) -> Result<ConfigResolution> {
        let config_path = self.resolve_config_path(cli_config_path);
        let file_config = match config_path {
            Some(ref path) => Self::load_file(path)?,
            None => None,
        };
        let config_path = config_path.filter(|_| file_config.is_some());

        let file_config = file_config.unwrap_or_default();
        let mut server = file_config.server;
        self.env_overrides.apply_to_server(&mut server);

        let mut providers = providers_from_env(&self.lookup);
        let env_providers: Vec<String> = providers.iter().map(|p| p.name.clone()).collect();

        let mut file_providers = Vec::new();
        let mut shadowed_file_providers = Vec::new();
        for file_provider in file_config.providers {
            // Whole-entry precedence: env wins by name, fields are never merged
            if providers.iter().any(|p| p.name == file_provider.name) {
                debug!(
                    "Skipping file provider '{}': already configured from environment",
                    file_provider.name
                );
                shadowed_file_providers.push(file_provider.name);
                continue;
            }
            file_providers.push(file_provider.name.clone());
            providers.push(file_provider);
        }

        Ok(ConfigResolution {
            config: Config { server, providers },
            config_path,
            env_overrides: self.env_overrides.clone(),
            env_providers,
            file_providers,
            shadowed_file_providers,
        })
    }

    /// Pick the config file path: CLI, then env var, then search directories
    fn resolve_config_path(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(cli_path) = cli_path {
            debug!("Using CLI-specified config path: {:?}", cli_path);
            return Some(cli_path.to_path_buf());
        }

        if let Some(ref env_path) = self.env_overrides.config_path {
            debug!("Using environment config path: {:?}", env_path);
            return Some(env_path.clone());
        }

        CONFIG_SEARCH_DIRS
            .iter()
            .map(|dir| Path::new(dir).join(CONFIG_FILE_NAME))
            .find(|path| path.exists())
    }

    /// Read and parse a config file; a missing file yields `None`
    fn load_file(path: &Path) -> Result<Option<Config>> {
        if !path.exists() {
            debug!("Config file {:?} not found, continuing without it", path);
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            DiscoveryError::config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        if content.trim().is_empty() {
            return Ok(Some(Config::default()));
        }

        serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|e| {
                DiscoveryError::config(format!("Failed to parse config file {:?}: {}", path, e))
            })
    }
}

impl Config {
    /// Load configuration from `.env` files, the process environment and an optional config file
    pub fn load(cli_config_path: Option<&Path>) -> Result<ConfigResolution> {
        crate::config::environment::load_env_files();
        Self::load_from(cli_config_path, crate::config::environment::process_env)
    }

    /// Load configuration using a custom variable lookup
    pub fn load_from<F>(cli_config_path: Option<&Path>, lookup: F) -> Result<ConfigResolution>
    where
        F: Fn(&str) -> Option<String>,
    {
        ConfigResolver::new(lookup)?.resolve(cli_config_path)
    }
}
