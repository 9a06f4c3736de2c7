//! Web layer: the discovery handler and its actix-web transport

pub mod discovery;
pub mod server;

pub use discovery::{configure, DiscoveryService, ProviderStatus};
pub use server::run_server;
