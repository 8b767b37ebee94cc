//! In-memory GeoIP table
//!
//! Exact-address table for local runs and tests where no `.mmdb` image is
//! available.

use std::collections::HashMap;
use std::net::IpAddr;

use super::provider::{GeoDatabase, GeoIpError, GeoRecord};

#[derive(Debug, Clone, Default)]
pub struct MemoryGeoDatabase {
    records: HashMap<IpAddr, GeoRecord>,
}

impl MemoryGeoDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, ip: IpAddr, record: GeoRecord) -> Self {
        self.records.insert(ip, record);
        self
    }
}

impl GeoDatabase for MemoryGeoDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, GeoIpError> {
        Ok(self.records.get(&ip).cloned())
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_hit_and_miss() {
        let ip: IpAddr = "8.8.8.8".parse().unwrap();
        let db = MemoryGeoDatabase::new().with_record(
            ip,
            GeoRecord {
                country: "US".into(),
                ..Default::default()
            },
        );

        assert_eq!(db.lookup(ip).unwrap().unwrap().country, "US");
        assert!(db.lookup("1.1.1.1".parse().unwrap()).unwrap().is_none());
    }
}
