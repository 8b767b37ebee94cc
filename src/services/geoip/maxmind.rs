//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 MaxMind GeoLite2-City.mmdb 文件进行 IP 地理位置查询

use std::net::IpAddr;
use std::sync::Arc;

use maxminddb::{MaxMindDbError, Reader, geoip2};
use tracing::trace;

use super::provider::{Coordinates, GeoDatabase, GeoIpError, GeoRecord};

/// MaxMind GeoIP database
pub struct MaxMindDatabase {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindDatabase {
    /// 从文件路径加载数据库
    pub fn open(path: &str) -> Result<Self, MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

impl From<MaxMindDbError> for GeoIpError {
    fn from(err: MaxMindDbError) -> Self {
        match err {
            // 数据库文件损坏或读取失败，后续查询同样会失败
            MaxMindDbError::InvalidDatabase { .. } | MaxMindDbError::Io { .. } => {
                GeoIpError::Unavailable(err.to_string())
            }
            MaxMindDbError::InvalidNetwork { .. } => GeoIpError::InvalidAddress(err.to_string()),
            _ => GeoIpError::Lookup(err.to_string()),
        }
    }
}

impl GeoDatabase for MaxMindDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, GeoIpError> {
        let result = self.reader.lookup(ip)?;
        let Some(city) = result.decode::<geoip2::City>()? else {
            trace!("MaxMind lookup for {}: no record", ip);
            return Ok(None);
        };

        let coordinates = match (city.location.latitude, city.location.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => None,
        };

        let record = GeoRecord {
            country: city.country.iso_code.unwrap_or_default().to_string(),
            city: city.city.names.english.unwrap_or_default().to_string(),
            coordinates,
            eu_member: city.country.is_in_european_union.unwrap_or(false),
            region: city
                .subdivisions
                .first()
                .and_then(|s| s.iso_code)
                .unwrap_or_default()
                .to_string(),
            timezone: city.location.time_zone.unwrap_or_default().to_string(),
        };

        trace!(
            "MaxMind lookup for {}: country={}, city={}",
            ip, record.country, record.city
        );

        Ok(Some(record))
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
