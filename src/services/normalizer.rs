//! 响应归一化
//!
//! Maps a [`LookupOutcome`] into the one public JSON shape. Pure: no I/O and
//! no logging, callers decide status codes and side effects.

use serde::{Deserialize, Serialize};

use crate::services::resolver::LookupOutcome;

pub const LOCALHOST_MESSAGE: &str = "This won't work on localhost";
pub const PROCESSING_ERROR_MESSAGE: &str = "Error occurred while trying to process the information";
pub const INVALID_LOCATION_MESSAGE: &str = "Invalid location data";

/// 成功时的地理位置信息
///
/// `country_code` and `country_name` carry the same ISO code; the database
/// has no localized country name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub country_code: String,
    pub country_name: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "IPv4")]
    pub ipv4: String,
    pub eu: String,
    pub region: String,
    pub timezone: String,
}

/// 对外响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicResponse {
    Location(LocationResponse),
    Error { error: String },
}

impl PublicResponse {
    pub fn error(message: &str) -> Self {
        PublicResponse::Error {
            error: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PublicResponse::Error { .. })
    }
}

pub fn normalize(outcome: &LookupOutcome, source_ip: &str) -> PublicResponse {
    match outcome {
        LookupOutcome::Success(record) => {
            // 坐标缺失时整个成功响应作废
            let Some(coords) = record.coordinates else {
                return PublicResponse::error(INVALID_LOCATION_MESSAGE);
            };
            PublicResponse::Location(LocationResponse {
                country_code: record.country.clone(),
                country_name: record.country.clone(),
                city: record.city.clone(),
                latitude: coords.latitude,
                longitude: coords.longitude,
                ipv4: source_ip.to_string(),
                eu: record.eu_flag().to_string(),
                region: record.region.clone(),
                timezone: record.timezone.clone(),
            })
        }
        LookupOutcome::LocalAddress => PublicResponse::error(LOCALHOST_MESSAGE),
        LookupOutcome::NotFound | LookupOutcome::Invalid => {
            PublicResponse::error(PROCESSING_ERROR_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geoip::{Coordinates, GeoRecord};
    use serde_json::json;

    fn record(coordinates: Option<Coordinates>) -> GeoRecord {
        GeoRecord {
            country: "US".into(),
            city: "Mountain View".into(),
            coordinates,
            eu_member: false,
            region: "CA".into(),
            timezone: "America/Los_Angeles".into(),
        }
    }

    #[test]
    fn test_success_maps_every_field() {
        let outcome = LookupOutcome::Success(record(Coordinates::new(37.4, -122.1)));
        let response = normalize(&outcome, "8.8.8.8");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "country_code": "US",
                "country_name": "US",
                "city": "Mountain View",
                "latitude": 37.4,
                "longitude": -122.1,
                "IPv4": "8.8.8.8",
                "eu": "0",
                "region": "CA",
                "timezone": "America/Los_Angeles"
            })
        );
    }

    #[test]
    fn test_source_ip_is_echoed_verbatim() {
        let outcome = LookupOutcome::Success(record(Coordinates::new(1.0, 2.0)));
        let PublicResponse::Location(location) = normalize(&outcome, "::ffff:8.8.8.8") else {
            panic!("expected location");
        };
        assert_eq!(location.ipv4, "::ffff:8.8.8.8");
        assert_eq!(location.latitude, 1.0);
        assert_eq!(location.longitude, 2.0);
    }

    #[test]
    fn test_missing_coordinates_is_error_only() {
        let outcome = LookupOutcome::Success(record(None));
        let response = normalize(&outcome, "8.8.8.8");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "error": "Invalid location data" })
        );
    }

    #[test]
    fn test_short_coordinates_is_error_only() {
        let outcome = LookupOutcome::Success(record(Coordinates::from_slice(&[37.4])));
        assert_eq!(
            normalize(&outcome, "8.8.8.8"),
            PublicResponse::error(INVALID_LOCATION_MESSAGE)
        );
    }

    #[test]
    fn test_local_address() {
        assert_eq!(
            normalize(&LookupOutcome::LocalAddress, "127.0.0.1"),
            PublicResponse::error(LOCALHOST_MESSAGE)
        );
    }

    #[test]
    fn test_not_found_and_invalid_share_message() {
        assert_eq!(
            normalize(&LookupOutcome::NotFound, "192.168.1.1"),
            PublicResponse::error(PROCESSING_ERROR_MESSAGE)
        );
        assert_eq!(
            normalize(&LookupOutcome::Invalid, "bogus"),
            PublicResponse::error(PROCESSING_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_eu_member_flag() {
        let mut eu = record(Coordinates::new(48.85, 2.35));
        eu.eu_member = true;
        let PublicResponse::Location(location) = normalize(&LookupOutcome::Success(eu), "1.1.1.1")
        else {
            panic!("expected location");
        };
        assert_eq!(location.eu, "1");
    }
}
