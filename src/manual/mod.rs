//! UTCP manual model
//!
//! The types published on the discovery endpoint.

pub mod types;

pub use types::{
    env_var_prefix, AuthPlaceholder, Manual, Property, Schema, Tool, ToolProvider, MANUAL_VERSION,
};
