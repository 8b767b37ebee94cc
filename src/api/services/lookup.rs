//! IP lookup endpoints
//!
//! - `GET /`        where is this caller
//! - `GET /ip/{ip}` where is this given address

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{info, warn};

use crate::api::ApiSettings;
use crate::api::error::ApiError;
use crate::api::middleware::{AttachedGeo, GeoContextMiddleware};
use crate::services::{IpResolver, LookupOutcome, PublicResponse, normalize};
use crate::utils::{extract_forwarded_ip, is_valid_ip_literal};

pub struct LookupService;

impl LookupService {
    /// Resolve the caller's own apparent address.
    ///
    /// Uses the forwarded-for header when present, otherwise the geo context
    /// attached for the connection peer.
    pub async fn lookup_self(
        req: HttpRequest,
        resolver: web::Data<IpResolver>,
        settings: web::Data<ApiSettings>,
        attached: Option<web::ReqData<AttachedGeo>>,
    ) -> HttpResponse {
        let development = settings.environment.is_development();

        if let Some(ip) = extract_forwarded_ip(req.headers()) {
            warn_if_malformed_header(&ip);
            return match resolver.try_resolve(&ip) {
                Ok(outcome) => Self::finish(&ip, &outcome),
                Err(e) => ApiError::resolution("Error processing IP address from header", Some(e))
                    .respond(&req, development),
            };
        }

        match attached {
            Some(geo) => Self::finish(&geo.ip, &geo.outcome),
            None => ApiError::resolution("Unable to determine client IP address", None)
                .respond(&req, development),
        }
    }

    /// Resolve an explicit address from the path, falling back to the
    /// forwarded-for header when the segment is empty.
    pub async fn lookup_ip(
        req: HttpRequest,
        resolver: web::Data<IpResolver>,
        settings: web::Data<ApiSettings>,
    ) -> HttpResponse {
        let development = settings.environment.is_development();

        let from_path = req
            .match_info()
            .get("ip")
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        let candidate = match from_path {
            Some(ip) if is_valid_ip_literal(ip) => ip.to_string(),
            Some(ip) => {
                // 格式不合法，直接 400，不进入解析
                return ApiError::validation(format!("Invalid IP address format: {:?}", ip))
                    .respond(&req, development);
            }
            None => match extract_forwarded_ip(req.headers()) {
                Some(ip) => {
                    warn_if_malformed_header(&ip);
                    ip
                }
                None => {
                    return ApiError::validation("No IP address supplied")
                        .respond(&req, development);
                }
            },
        };

        info!("Requested IP: {}", candidate);

        match resolver.try_resolve(&candidate) {
            Ok(outcome) => Self::finish(&candidate, &outcome),
            Err(e) => ApiError::resolution(
                format!("Error processing IP address: {}", candidate),
                Some(e),
            )
            .respond(&req, development),
        }
    }

    fn finish(ip: &str, outcome: &LookupOutcome) -> HttpResponse {
        let response = normalize(outcome, ip);
        match &response {
            PublicResponse::Location(location) => {
                info!(
                    "IP {} is from {}, {}",
                    location.ipv4, location.city, location.country_code
                );
            }
            PublicResponse::Error { error } => {
                info!("IP {} could not be located: {}", ip, error);
            }
        }
        HttpResponse::Ok().json(response)
    }
}

/// Header-derived addresses are ambient metadata: only warn, never block.
fn warn_if_malformed_header(ip: &str) {
    if !is_valid_ip_literal(ip) {
        warn!("Invalid IP in headers: {}", ip);
    }
}

/// Lookup 路由配置
pub fn lookup_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .wrap(GeoContextMiddleware)
            .route(web::get().to(LookupService::lookup_self)),
    )
    .service(
        web::resource(["/ip", "/ip/", "/ip/{ip}"])
            .route(web::get().to(LookupService::lookup_ip)),
    );
}
