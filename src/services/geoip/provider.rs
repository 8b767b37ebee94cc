//! GeoIP 数据源抽象层
//!
//! The lookup collaborator is synchronous and read-only: a database image is
//! loaded once at startup and shared by every worker behind an `Arc`.

use std::fmt;
use std::net::IpAddr;

/// 经纬度坐标
///
/// Only finite values are representable; a record without usable coordinates
/// carries `None` instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }

    /// Build from a `[lat, lon, ...]` style slice. Fewer than two entries
    /// yields `None`.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [latitude, longitude, ..] => Self::new(*latitude, *longitude),
            _ => None,
        }
    }
}

/// 单条地理位置记录
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoRecord {
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "CN", "US")
    pub country: String,
    pub city: String,
    pub coordinates: Option<Coordinates>,
    pub eu_member: bool,
    /// 一级行政区代码 (e.g., "CA", "ON")
    pub region: String,
    /// IANA timezone name
    pub timezone: String,
}

impl GeoRecord {
    /// `"1"` / `"0"`, the flag format exposed on the wire
    pub fn eu_flag(&self) -> &'static str {
        if self.eu_member { "1" } else { "0" }
    }
}

/// 数据库查询错误
#[derive(Debug, Clone, PartialEq)]
pub enum GeoIpError {
    /// The address cannot be looked up at all (e.g. unsupported family)
    InvalidAddress(String),
    /// A single lookup failed; the database itself is still usable
    Lookup(String),
    /// The database is unusable, every lookup would fail
    Unavailable(String),
}

impl GeoIpError {
    pub fn message(&self) -> &str {
        match self {
            GeoIpError::InvalidAddress(msg) => msg,
            GeoIpError::Lookup(msg) => msg,
            GeoIpError::Unavailable(msg) => msg,
        }
    }

    /// Whether the failure belongs to the database rather than the request
    pub fn is_fatal(&self) -> bool {
        matches!(self, GeoIpError::Unavailable(_))
    }
}

impl fmt::Display for GeoIpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoIpError::InvalidAddress(msg) => write!(f, "invalid address: {}", msg),
            GeoIpError::Lookup(msg) => write!(f, "lookup failed: {}", msg),
            GeoIpError::Unavailable(msg) => write!(f, "geoip database unavailable: {}", msg),
        }
    }
}

impl std::error::Error for GeoIpError {}

/// GeoIP 查询 trait
pub trait GeoDatabase: Send + Sync {
    /// 查询 IP 地址的地理位置，`Ok(None)` 表示数据库中没有该地址
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, GeoIpError>;

    /// 获取数据源名称（用于日志）
    fn name(&self) -> &'static str;
}
