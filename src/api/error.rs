//! HTTP error formatting
//!
//! Every non-2xx response leaves through [`ApiError::respond`], which logs
//! the full request context and emits
//! `{"error": {message, status, timestamp, requestId, path}}`.

use actix_web::http::StatusCode;
use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::api::middleware::RequestId;
use crate::api::services::health::HealthStatus;
use crate::services::GeoIpError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const HEALTH_FAILED_MESSAGE: &str = "Health check failed - service unavailable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub message: String,
    pub status: u16,
    pub timestamp: String,
    pub request_id: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    #[serde(
        rename = "healthCheck",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check: Option<HealthStatus>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Malformed IP on the explicit-input path
    Validation(String),
    /// The lookup collaborator failed outright
    Resolution {
        message: String,
        source: Option<GeoIpError>,
    },
    /// Health probe could not reach the database
    HealthUnavailable(Box<HealthStatus>),
    RouteNotFound(String),
}

impl ApiError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn resolution<T: Into<String>>(msg: T, source: Option<GeoIpError>) -> Self {
        ApiError::Resolution {
            message: msg.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Resolution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::HealthUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg) => msg,
            ApiError::Resolution { message, .. } => message,
            ApiError::HealthUnavailable(_) => HEALTH_FAILED_MESSAGE,
            ApiError::RouteNotFound(msg) => msg,
        }
    }

    /// Message placed in the response body.
    ///
    /// 5xx detail is hidden outside development mode. The health failure
    /// message is fixed text and stays visible.
    pub fn public_message(&self, development: bool) -> String {
        match self {
            ApiError::HealthUnavailable(_) => HEALTH_FAILED_MESSAGE.to_string(),
            _ if self.status().is_server_error() && !development => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => self.message().to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Resolution {
                message,
                source: Some(source),
            } => format!("{}: {}", message, source),
            _ => self.message().to_string(),
        }
    }

    pub fn to_body(&self, req: &HttpRequest, development: bool) -> ErrorBody {
        ErrorBody {
            error: ErrorDetail {
                message: self.public_message(development),
                status: self.status().as_u16(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                request_id: RequestId::of(req),
                path: req.path().to_string(),
            },
            health_check: match self {
                ApiError::HealthUnavailable(status) => Some((**status).clone()),
                _ => None,
            },
        }
    }

    /// Log with request context and build the trimmed public response
    pub fn respond(self, req: &HttpRequest, development: bool) -> HttpResponse {
        let status = self.status();
        let request_id = RequestId::of(req);
        let peer = req
            .peer_addr()
            .map(|a| a.ip().to_string())
            .unwrap_or_default();
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        let params: Vec<String> = req
            .match_info()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();

        if status.is_server_error() {
            error!(
                error = %self.detail(),
                status = status.as_u16(),
                method = %req.method(),
                url = %req.uri(),
                ip = %peer,
                user_agent = %user_agent,
                request_id = %request_id,
                params = ?params,
                "Server error occurred"
            );
        } else {
            warn!(
                error = %self.detail(),
                status = status.as_u16(),
                method = %req.method(),
                url = %req.uri(),
                ip = %peer,
                user_agent = %user_agent,
                request_id = %request_id,
                params = ?params,
                "Client error occurred"
            );
        }

        HttpResponse::build(status).json(self.to_body(req, development))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::resolution("boom", None).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::RouteNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_server_error_detail_hidden_in_production() {
        let err = ApiError::resolution(
            "Error processing IP address: 1.2.3.4",
            Some(GeoIpError::Unavailable("mmap failed".into())),
        );
        assert_eq!(err.public_message(false), INTERNAL_ERROR_MESSAGE);
        assert_eq!(
            err.public_message(true),
            "Error processing IP address: 1.2.3.4"
        );
        assert!(err.to_string().contains("mmap failed"));
    }

    #[test]
    fn test_client_error_detail_always_visible() {
        let err = ApiError::validation("Invalid IP address format: \"nope\"");
        assert_eq!(
            err.public_message(false),
            "Invalid IP address format: \"nope\""
        );
    }

    #[test]
    fn test_body_uses_header_request_id_and_path() {
        let req = TestRequest::get()
            .uri("/ip/nope")
            .insert_header(("x-request-id", "abc-123"))
            .to_http_request();
        let body = ApiError::validation("bad").to_body(&req, false);

        assert_eq!(body.error.status, 400);
        assert_eq!(body.error.request_id, "abc-123");
        assert_eq!(body.error.path, "/ip/nope");
        assert!(body.health_check.is_none());

        let json = serde_json::to_value(&body).unwrap();
        assert!(json["error"].get("requestId").is_some());
        assert!(json.get("healthCheck").is_none());
    }

    #[test]
    fn test_unknown_request_id() {
        let req = TestRequest::get().uri("/").to_http_request();
        let body = ApiError::RouteNotFound("Route GET /x not found".into()).to_body(&req, false);
        assert_eq!(body.error.request_id, "unknown");
    }
}
