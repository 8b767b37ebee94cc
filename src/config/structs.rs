use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::errors::{LocatorError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const ENV_PREFIX: &str = "LTZ";

/// 运行环境
///
/// `Development` exposes full error detail on 5xx responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
    Test,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
            Self::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            _ => Err(format!(
                "Invalid environment: '{}'. Valid: production, development, test",
                s
            )),
        }
    }
}

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：LTZ，分隔符：__
    /// 示例：LTZ__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment as EnvSource, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                EnvSource::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 启动前校验
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(LocatorError::config("server.port must be non-zero"));
        }
        if self.server.workers == 0 {
            return Err(LocatorError::config("server.workers must be at least 1"));
        }
        if self.geoip.health_probe_ip.parse::<IpAddr>().is_err() {
            return Err(LocatorError::config(format!(
                "geoip.health_probe_ip is not an IP address: '{}'",
                self.geoip.health_probe_ip
            )));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(LocatorError::config(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub environment: Environment,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// GeoIP 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// MaxMind GeoLite2-City.mmdb 路径
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Address resolved by the health check as a smoke test
    #[serde(default = "default_health_probe_ip")]
    pub health_probe_ip: String,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    7755
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_database_path() -> String {
    "GeoLite2-City.mmdb".to_string()
}

fn default_health_probe_ip() -> String {
    "8.8.8.8".to_string()
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_max_age() -> usize {
    3600
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
            environment: Environment::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            health_probe_ip: default_health_probe_ip(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            max_age: default_cors_max_age(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = StaticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 7755);
        assert_eq!(config.geoip.health_probe_ip, "8.8.8.8");
        assert_eq!(config.server.environment, Environment::Production);
    }

    #[test]
    fn test_validate_rejects_bad_probe_ip() {
        let mut config = StaticConfig::default();
        config.geoip.health_probe_ip = "dns.google".to_string();
        assert!(matches!(config.validate(), Err(LocatorError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = StaticConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locator.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\nenvironment = \"development\"\n\n[geoip]\nhealth_probe_ip = \"1.1.1.1\""
        )
        .unwrap();

        let config = StaticConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.server.environment.is_development());
        assert_eq!(config.geoip.health_probe_ip, "1.1.1.1");
        assert_eq!(config.geoip.database_path, "GeoLite2-City.mmdb");
    }

    #[test]
    fn test_sample_config_round_trips_through_file() {
        let sample = StaticConfig::generate_sample_config().unwrap();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("health_probe_ip"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        StaticConfig::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "Development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
    }
}
