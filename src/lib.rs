//! location-timezone - IP geolocation microservice
//!
//! Resolves a caller's or a requested IP address to country, city,
//! coordinates, region and timezone using an offline GeoIP database.
//!
//! # Architecture
//! - `services`: IP resolver, response normalizer, GeoIP database adapters
//! - `api`: HTTP routes, middleware and error formatting
//! - `config`: Static configuration (TOML + environment)
//! - `runtime`: Server and CLI execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
