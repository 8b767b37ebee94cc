use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, trace, warn};

use crate::api::ApiSettings;
use crate::api::error::ApiError;
use crate::services::IpResolver;
use crate::utils::{format_duration_human, uptime_seconds};

pub const HEALTHY_MESSAGE: &str = "OK";
pub const DEGRADED_MESSAGE: &str = "Service degraded - GeoIP lookup issues";

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Operational,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDependencies {
    #[serde(rename = "geoipLite")]
    pub geoip_lite: DependencyStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// 运行秒数
    pub uptime: f64,
    pub message: String,
    pub timestamp: String,
    pub environment: String,
    pub version: String,
    pub dependencies: HealthDependencies,
}

/// Health Service
///
/// The probe resolves a well-known public address. A missing record only
/// degrades the check; a database fault fails it with 503.
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        req: HttpRequest,
        resolver: web::Data<IpResolver>,
        settings: web::Data<ApiSettings>,
        app_start_time: web::Data<AppStartTime>,
    ) -> HttpResponse {
        let start_time = Instant::now();
        trace!("Received health check request");

        let probe = resolver.try_resolve(&settings.health_probe_ip);
        let (geoip_lite, message) = match &probe {
            Ok(outcome) if outcome.is_success() => {
                (DependencyStatus::Operational, HEALTHY_MESSAGE)
            }
            Ok(outcome) => {
                warn!(
                    "GeoIP health probe for {} returned {:?}",
                    settings.health_probe_ip, outcome
                );
                (DependencyStatus::Warning, DEGRADED_MESSAGE)
            }
            Err(e) => {
                error!("GeoIP health probe failed: {}", e);
                (
                    DependencyStatus::Error,
                    crate::api::error::HEALTH_FAILED_MESSAGE,
                )
            }
        };

        let now = chrono::Utc::now();
        let status = HealthStatus {
            uptime: uptime_seconds(app_start_time.start_datetime, now),
            message: message.to_string(),
            timestamp: now.to_rfc3339(),
            environment: settings.environment.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            dependencies: HealthDependencies { geoip_lite },
        };

        info!(
            "Health check completed in {:?}, geoip: {:?}, uptime: {}",
            start_time.elapsed(),
            geoip_lite,
            format_duration_human(app_start_time.start_datetime, now)
        );

        match probe {
            Ok(_) => HttpResponse::Ok().json(status),
            Err(_) => ApiError::HealthUnavailable(Box::new(status))
                .respond(&req, settings.environment.is_development()),
        }
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
}
