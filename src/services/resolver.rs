//! IP 解析服务
//!
//! Turns a textual IP candidate into a [`LookupOutcome`]:
//! loopback short-circuit, IPv4-mapped IPv6 unwrapping, then a single call
//! into the [`GeoDatabase`] collaborator.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::services::geoip::{GeoDatabase, GeoIpError, GeoRecord};
use crate::utils::is_private_or_local;

/// Diagnostic logged when a lookup fails and is absorbed into `Invalid`
pub const LOOKUP_FAILURE_DIAGNOSTIC: &str = "error occurred while trying to process the information";

/// 查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Success(GeoRecord),
    LocalAddress,
    NotFound,
    Invalid,
}

impl LookupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }
}

#[derive(Clone)]
pub struct IpResolver {
    database: Arc<dyn GeoDatabase>,
}

impl IpResolver {
    pub fn new(database: Arc<dyn GeoDatabase>) -> Self {
        Self { database }
    }

    pub fn database_name(&self) -> &'static str {
        self.database.name()
    }

    /// Resolve a candidate, absorbing every failure into an outcome variant.
    pub fn resolve(&self, candidate: &str) -> LookupOutcome {
        self.try_resolve(candidate).unwrap_or_else(|e| {
            error!("{} ({}): {}", LOOKUP_FAILURE_DIAGNOSTIC, candidate, e);
            LookupOutcome::Invalid
        })
    }

    /// Same pipeline as [`resolve`](Self::resolve), but a database that is
    /// unusable is reported as an error instead of `Invalid`.
    pub fn try_resolve(&self, candidate: &str) -> Result<LookupOutcome, GeoIpError> {
        let Some(addr) = parse_candidate(candidate) else {
            debug!("Unparseable IP candidate: {:?}", candidate);
            return Ok(LookupOutcome::Invalid);
        };

        // 本地地址数据库无法解析，直接返回
        if addr.is_loopback() {
            return Ok(LookupOutcome::LocalAddress);
        }

        if is_private_or_local(&addr) {
            debug!("Private address {} is unlikely to be in the database", addr);
        }

        match self.database.lookup(addr) {
            Ok(Some(record)) => Ok(LookupOutcome::Success(record)),
            Ok(None) => {
                debug!("{} lookup for {}: not found", self.database.name(), addr);
                Ok(LookupOutcome::NotFound)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("{} ({}): {}", LOOKUP_FAILURE_DIAGNOSTIC, addr, e);
                Ok(LookupOutcome::Invalid)
            }
        }
    }
}

/// Parse a candidate into the address the database should see.
///
/// `::ffff:a.b.c.d` is unwrapped to its embedded IPv4 address.
fn parse_candidate(candidate: &str) -> Option<IpAddr> {
    let addr: IpAddr = candidate.trim().parse().ok()?;
    match addr {
        IpAddr::V6(v6) => Some(
            v6.to_ipv4_mapped()
                .map(IpAddr::V4)
                .unwrap_or(IpAddr::V6(v6)),
        ),
        v4 => Some(v4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::services::geoip::{Coordinates, MemoryGeoDatabase};

    struct RecordingDatabase {
        calls: Mutex<Vec<IpAddr>>,
        response: Result<Option<GeoRecord>, GeoIpError>,
    }

    impl RecordingDatabase {
        fn new(response: Result<Option<GeoRecord>, GeoIpError>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                response,
            })
        }

        fn calls(&self) -> Vec<IpAddr> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GeoDatabase for RecordingDatabase {
        fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, GeoIpError> {
            self.calls.lock().unwrap().push(ip);
            self.response.clone()
        }

        fn name(&self) -> &'static str {
            "Recording"
        }
    }

    fn sample_record() -> GeoRecord {
        GeoRecord {
            country: "US".into(),
            city: "Mountain View".into(),
            coordinates: Coordinates::new(37.4, -122.1),
            eu_member: false,
            region: "CA".into(),
            timezone: "America/Los_Angeles".into(),
        }
    }

    #[test]
    fn test_loopback_never_reaches_database() {
        let db = RecordingDatabase::new(Ok(Some(sample_record())));
        let resolver = IpResolver::new(db.clone());

        assert_eq!(resolver.resolve("127.0.0.1"), LookupOutcome::LocalAddress);
        assert_eq!(resolver.resolve("::1"), LookupOutcome::LocalAddress);
        assert!(db.calls().is_empty());
    }

    #[test]
    fn test_mapped_ipv4_is_unwrapped() {
        let db = RecordingDatabase::new(Ok(Some(sample_record())));
        let resolver = IpResolver::new(db.clone());

        let outcome = resolver.resolve("::ffff:8.8.8.8");

        assert!(outcome.is_success());
        assert_eq!(db.calls(), vec!["8.8.8.8".parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn test_mapped_loopback_is_local() {
        let db = RecordingDatabase::new(Ok(None));
        let resolver = IpResolver::new(db.clone());

        assert_eq!(
            resolver.resolve("::ffff:127.0.0.1"),
            LookupOutcome::LocalAddress
        );
        assert!(db.calls().is_empty());
    }

    #[test]
    fn test_malformed_candidate_is_invalid() {
        let db = RecordingDatabase::new(Ok(Some(sample_record())));
        let resolver = IpResolver::new(db.clone());

        assert_eq!(resolver.resolve("not-an-ip"), LookupOutcome::Invalid);
        assert_eq!(resolver.resolve(""), LookupOutcome::Invalid);
        assert_eq!(resolver.resolve("10.0.0.0/8"), LookupOutcome::Invalid);
        assert!(db.calls().is_empty());
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let resolver = IpResolver::new(Arc::new(MemoryGeoDatabase::new()));
        assert_eq!(resolver.resolve("192.168.1.1"), LookupOutcome::NotFound);
    }

    #[test]
    fn test_lookup_error_is_absorbed() {
        let db = RecordingDatabase::new(Err(GeoIpError::Lookup("corrupt node".into())));
        let resolver = IpResolver::new(db);

        assert_eq!(resolver.resolve("8.8.8.8"), LookupOutcome::Invalid);
        assert_eq!(resolver.try_resolve("8.8.8.8"), Ok(LookupOutcome::Invalid));
    }

    #[test]
    fn test_unavailable_database_surfaces_from_try_resolve() {
        let db = RecordingDatabase::new(Err(GeoIpError::Unavailable("mmap gone".into())));
        let resolver = IpResolver::new(db);

        assert!(matches!(
            resolver.try_resolve("8.8.8.8"),
            Err(GeoIpError::Unavailable(_))
        ));
        assert_eq!(resolver.resolve("8.8.8.8"), LookupOutcome::Invalid);
    }

    #[test]
    fn test_success_passes_record_through() {
        let db = RecordingDatabase::new(Ok(Some(sample_record())));
        let resolver = IpResolver::new(db);

        assert_eq!(
            resolver.resolve(" 8.8.8.8 "),
            LookupOutcome::Success(sample_record())
        );
    }
}
