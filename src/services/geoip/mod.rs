//! GeoIP 服务模块
//!
//! 提供 IP 地址地理位置查询功能：
//! - MaxMind GeoLite2 本地数据库
//! - 内存表（本地调试 / 测试）

mod maxmind;
mod memory;
mod provider;

use std::sync::Arc;

use tracing::info;

use crate::config::GeoIpConfig;
use crate::errors::{LocatorError, Result};

pub use maxmind::MaxMindDatabase;
pub use memory::MemoryGeoDatabase;
pub use provider::{Coordinates, GeoDatabase, GeoIpError, GeoRecord};

/// 根据配置加载数据库
///
/// The image is read once here and shared read-only afterwards.
pub fn open_database(config: &GeoIpConfig) -> Result<Arc<dyn GeoDatabase>> {
    let path = &config.database_path;
    let database = MaxMindDatabase::open(path).map_err(|e| {
        LocatorError::database_load(format!("failed to open {}: {}", path, e))
    })?;

    info!("GeoIP: Using MaxMind database at {}", path);
    Ok(Arc::new(database))
}
