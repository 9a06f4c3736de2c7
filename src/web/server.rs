//! HTTP transport for the discovery endpoint

use crate::config::Config;
use crate::error::Result;
use crate::providers::ProviderRegistry;
use crate::web::discovery::{self, DiscoveryService};
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;

/// Bind `server.host:server.port` and serve until shutdown
pub async fn run_server(config: &Config, registry: Arc<ProviderRegistry>) -> Result<()> {
    let addr = config.server.bind_address()?;
    let service = web::Data::new(DiscoveryService::new(registry));

    info!("Starting HTTP server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(discovery::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
