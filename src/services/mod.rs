//! Service layer
//!
//! IP resolution and response normalization, shared by the HTTP API and the
//! `lookup` command.

pub mod geoip;
pub mod normalizer;
pub mod resolver;

pub use geoip::{
    Coordinates, GeoDatabase, GeoIpError, GeoRecord, MaxMindDatabase, MemoryGeoDatabase,
    open_database,
};
pub use normalizer::{LocationResponse, PublicResponse, normalize};
pub use resolver::{IpResolver, LookupOutcome};
