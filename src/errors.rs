use std::fmt;

#[derive(Debug, Clone)]
pub enum LocatorError {
    Config(String),
    DatabaseLoad(String),
    Lookup(String),
    FileOperation(String),
    Serialization(String),
    Validation(String),
}

impl LocatorError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LocatorError::Config(_) => "E001",
            LocatorError::DatabaseLoad(_) => "E002",
            LocatorError::Lookup(_) => "E003",
            LocatorError::FileOperation(_) => "E004",
            LocatorError::Serialization(_) => "E005",
            LocatorError::Validation(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LocatorError::Config(_) => "Configuration Error",
            LocatorError::DatabaseLoad(_) => "GeoIP Database Load Error",
            LocatorError::Lookup(_) => "GeoIP Lookup Error",
            LocatorError::FileOperation(_) => "File Operation Error",
            LocatorError::Serialization(_) => "Serialization Error",
            LocatorError::Validation(_) => "Validation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LocatorError::Config(msg) => msg,
            LocatorError::DatabaseLoad(msg) => msg,
            LocatorError::Lookup(msg) => msg,
            LocatorError::FileOperation(msg) => msg,
            LocatorError::Serialization(msg) => msg,
            LocatorError::Validation(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LocatorError {}

// 便捷的构造函数
impl LocatorError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        LocatorError::Config(msg.into())
    }

    pub fn database_load<T: Into<String>>(msg: T) -> Self {
        LocatorError::DatabaseLoad(msg.into())
    }

    pub fn lookup<T: Into<String>>(msg: T) -> Self {
        LocatorError::Lookup(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LocatorError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LocatorError::Serialization(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LocatorError::Validation(msg.into())
    }
}

impl From<std::io::Error> for LocatorError {
    fn from(err: std::io::Error) -> Self {
        LocatorError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LocatorError {
    fn from(err: serde_json::Error) -> Self {
        LocatorError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for LocatorError {
    fn from(err: toml::ser::Error) -> Self {
        LocatorError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for LocatorError {
    fn from(err: config::ConfigError) -> Self {
        LocatorError::Config(err.to_string())
    }
}

impl From<crate::services::GeoIpError> for LocatorError {
    fn from(err: crate::services::GeoIpError) -> Self {
        LocatorError::lookup(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
