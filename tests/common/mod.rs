//! Shared fixtures for HTTP tests

#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use location_timezone::services::{Coordinates, GeoDatabase, GeoIpError, GeoRecord};

/// Database stub that records every address it is asked about
pub struct StubDatabase {
    calls: Mutex<Vec<IpAddr>>,
    response: Result<Option<GeoRecord>, GeoIpError>,
}

impl StubDatabase {
    pub fn returning(record: GeoRecord) -> Arc<Self> {
        Self::with_response(Ok(Some(record)))
    }

    pub fn empty() -> Arc<Self> {
        Self::with_response(Ok(None))
    }

    pub fn failing(err: GeoIpError) -> Arc<Self> {
        Self::with_response(Err(err))
    }

    pub fn with_response(response: Result<Option<GeoRecord>, GeoIpError>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response,
        })
    }

    pub fn calls(&self) -> Vec<IpAddr> {
        self.calls.lock().unwrap().clone()
    }
}

impl GeoDatabase for StubDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, GeoIpError> {
        self.calls.lock().unwrap().push(ip);
        self.response.clone()
    }

    fn name(&self) -> &'static str {
        "Stub"
    }
}

pub fn mountain_view() -> GeoRecord {
    GeoRecord {
        country: "US".into(),
        city: "Mountain View".into(),
        coordinates: Coordinates::new(37.4, -122.1),
        eu_member: false,
        region: "CA".into(),
        timezone: "America/Los_Angeles".into(),
    }
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// Build the full application around a database stub
macro_rules! test_app {
    ($db:expr) => {
        test_app!($db, location_timezone::api::ApiSettings::default())
    };
    ($db:expr, $settings:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(location_timezone::api::middleware::RequestIdMiddleware)
                .app_data(actix_web::web::Data::new(
                    location_timezone::services::IpResolver::new($db),
                ))
                .app_data(actix_web::web::Data::new($settings))
                .app_data(actix_web::web::Data::new(
                    location_timezone::api::services::AppStartTime::now(),
                ))
                .configure(location_timezone::api::configure),
        )
        .await
    };
}
