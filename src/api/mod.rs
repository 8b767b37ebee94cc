//! HTTP API: routes, middleware and error formatting

pub mod error;
pub mod middleware;
pub mod services;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::config::{Environment, StaticConfig, get_config};
use error::ApiError;

/// Per-app settings shared with handlers as `web::Data<ApiSettings>`
#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub environment: Environment,
    pub health_probe_ip: String,
}

impl ApiSettings {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            environment: config.server.environment,
            health_probe_ip: config.geoip.health_probe_ip.clone(),
        }
    }
}

/// Settings derived from the global configuration
impl Default for ApiSettings {
    fn default() -> Self {
        Self::from_config(&get_config())
    }
}

/// 未匹配路由
pub async fn route_not_found(req: HttpRequest, settings: web::Data<ApiSettings>) -> HttpResponse {
    ApiError::RouteNotFound(format!("Route {} {} not found", req.method(), req.path()))
        .respond(&req, settings.environment.is_development())
}

/// Register every route plus the 404 fallback
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(services::lookup_routes)
        .service(services::health_routes())
        .default_service(web::to(route_not_found));
}
