//! Discovery handler: builds the manual from live registry state

use crate::error::{DiscoveryError, Result};
use crate::manual::Manual;
use crate::providers::{Provider, ProviderRegistry};
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Builds manuals on demand from the provider registry
#[derive(Debug, Clone)]
pub struct DiscoveryService {
    registry: Arc<ProviderRegistry>,
}

/// Operator view of one provider instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub enabled: bool,
}

impl DiscoveryService {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// A fresh manual holding every enabled provider's tools
    pub fn manual(&self) -> Manual {
        let mut manual = Manual::new();
        manual.extend(self.registry.get_all_tools());
        debug!(tools = manual.tools.len(), "Built manual");
        manual
    }

    /// Every provider instance in creation order
    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        self.registry
            .get_all_providers()
            .iter()
            .map(|provider| ProviderStatus::of(provider.as_ref()))
            .collect()
    }

    /// Status of one instance
    pub fn provider_status(&self, name: &str) -> Result<ProviderStatus> {
        self.registry
            .get_provider(name)
            .map(|provider| ProviderStatus::of(provider.as_ref()))
            .ok_or_else(|| DiscoveryError::not_found(format!("provider {}", name)))
    }
}

impl ProviderStatus {
    fn of(provider: &dyn Provider) -> Self {
        Self {
            name: provider.name().to_string(),
            provider_type: provider.provider_type().to_string(),
            enabled: provider.is_enabled(),
        }
    }
}

/// GET /utcp
pub async fn utcp_manual(service: web::Data<DiscoveryService>) -> HttpResponse {
    HttpResponse::Ok().json(service.manual())
}

/// GET /providers
pub async fn list_providers(service: web::Data<DiscoveryService>) -> HttpResponse {
    HttpResponse::Ok().json(service.provider_statuses())
}

/// GET /providers/{name}
pub async fn get_provider(
    service: web::Data<DiscoveryService>,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    let status = service.provider_status(&name)?;
    Ok(HttpResponse::Ok().json(status))
}

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Register the discovery routes on an app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/utcp", web::get().to(utcp_manual))
        .route("/providers", web::get().to(list_providers))
        .route("/providers/{name}", web::get().to(get_provider))
        .route("/health", web::get().to(health_check));
}
