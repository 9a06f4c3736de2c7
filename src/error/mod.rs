//! Error handling module for the discovery server
//!
//! This module provides the error taxonomy shared by configuration, registry and transport.

mod error;

// Re-export the main error types and utilities
pub use error::{DiscoveryError, ErrorKind, Result};
