//! Configuration module for the discovery server
//!
//! Settings come from an optional YAML file, `.env` files and the process
//! environment. Environment-derived providers take precedence over file
//! entries with the same name.

mod config;
mod environment;
mod resolver;
mod validator;

pub use config::{AuthDescriptor, Config, LogFormat, ProviderConfig, ServerConfig};
pub use environment::{
    env_value, load_env_files, process_env, providers_from_env, EnvVars, EnvironmentOverrides,
};
pub use resolver::{ConfigResolution, ConfigResolver, CONFIG_FILE_NAME, CONFIG_SEARCH_DIRS};
pub use validator::{ConfigValidator, ValidationResult, KNOWN_PROVIDER_TYPES};
