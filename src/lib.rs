//! UTCP discovery server
//!
//! Publishes a UTCP manual describing the Jira, Confluence and GitLab
//! operations an agent may call directly. The server never proxies calls
//! and never publishes credentials; auth descriptors in the manual only
//! name the environment variables the calling agent should read.

pub mod config;
pub mod error;
pub mod manual;
pub mod providers;
pub mod startup;
pub mod web;

pub use config::Config;
pub use error::{DiscoveryError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
