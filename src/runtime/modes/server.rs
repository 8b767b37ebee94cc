//! Server mode
//!
//! Loads the GeoIP database once, then serves the lookup and health routes.

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::AppStartTime;
use crate::api::{self, ApiSettings};
use crate::config::{CorsConfig, StaticConfig};
use crate::services::{IpResolver, open_database};

/// Build CORS middleware from configuration
///
/// Enabled means any origin may issue read-only requests.
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    if !cors_config.enabled {
        return Cors::default();
    }

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "HEAD", "OPTIONS"])
        .allow_any_header()
        .max_age(cors_config.max_age)
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let database = open_database(&config.geoip).context("Failed to load GeoIP database")?;
    let resolver = IpResolver::new(database);
    info!("GeoIP: Initialized with {} database", resolver.database_name());

    let settings = ApiSettings::from_config(&config);
    if settings.environment.is_development() {
        warn!("Development mode: server error details are exposed in responses");
    }

    let cors_config = config.cors.clone();
    let workers = config.server.workers.clamp(1, 32);
    info!("Using {} worker threads", workers);

    let resolver_data = web::Data::new(resolver);
    let settings_data = web::Data::new(settings);
    let start_data = web::Data::new(app_start_time);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(build_cors_middleware(&cors_config))
            .wrap(RequestIdMiddleware)
            .app_data(resolver_data.clone())
            .app_data(settings_data.clone())
            .app_data(start_data.clone())
            .configure(api::configure)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .workers(workers);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server terminated with an error")?;

    warn!("Server stopped");
    Ok(())
}
