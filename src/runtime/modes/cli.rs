//! CLI mode
//!
//! One-shot commands that do not start the HTTP server.

use std::path::Path;

use crate::config::{GeoIpConfig, StaticConfig};
use crate::errors::{LocatorError, Result};
use crate::services::{IpResolver, PublicResponse, normalize, open_database};
use crate::utils::is_valid_ip_literal;

/// Resolve a single address and render the public JSON response
pub fn lookup(geoip: &GeoIpConfig, ip: &str) -> Result<String> {
    if !is_valid_ip_literal(ip) {
        return Err(LocatorError::validation(format!(
            "Invalid IP address format: {:?}",
            ip
        )));
    }

    let resolver = IpResolver::new(open_database(geoip)?);
    let response = lookup_with(&resolver, ip)?;
    Ok(serde_json::to_string_pretty(&response)?)
}

/// Like [`lookup`], against an already constructed resolver
pub fn lookup_with(resolver: &IpResolver, ip: &str) -> Result<PublicResponse> {
    let outcome = resolver.try_resolve(ip)?;
    Ok(normalize(&outcome, ip))
}

/// Write the default configuration as TOML, or return it when no path is given
pub fn generate_config(output: Option<&Path>) -> Result<Option<String>> {
    match output {
        Some(path) => {
            StaticConfig::default().save_to_file(path)?;
            Ok(None)
        }
        None => Ok(Some(StaticConfig::generate_sample_config()?)),
    }
}
