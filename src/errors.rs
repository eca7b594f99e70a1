use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LivelinkError {
    InvalidInput(String),
    ReservedPath(String),
    InvalidExpiry(String),
    MissingQrData(String),
    DuplicateKey(String),
    NotFound(String),
    StorageError(String),
    Config(String),
    Serialization(String),
    SourceError(String),
}

impl LivelinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LivelinkError::InvalidInput(_) => "E001",
            LivelinkError::ReservedPath(_) => "E002",
            LivelinkError::InvalidExpiry(_) => "E003",
            LivelinkError::MissingQrData(_) => "E004",
            LivelinkError::DuplicateKey(_) => "E005",
            LivelinkError::NotFound(_) => "E006",
            LivelinkError::StorageError(_) => "E007",
            LivelinkError::Config(_) => "E008",
            LivelinkError::Serialization(_) => "E009",
            LivelinkError::SourceError(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LivelinkError::InvalidInput(_) => "Invalid Input",
            LivelinkError::ReservedPath(_) => "Reserved Path",
            LivelinkError::InvalidExpiry(_) => "Invalid Expiry",
            LivelinkError::MissingQrData(_) => "Missing QR Data",
            LivelinkError::DuplicateKey(_) => "Duplicate Key",
            LivelinkError::NotFound(_) => "Resource Not Found",
            LivelinkError::StorageError(_) => "Storage Error",
            LivelinkError::Config(_) => "Configuration Error",
            LivelinkError::Serialization(_) => "Serialization Error",
            LivelinkError::SourceError(_) => "Legacy Source Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LivelinkError::InvalidInput(msg)
            | LivelinkError::ReservedPath(msg)
            | LivelinkError::InvalidExpiry(msg)
            | LivelinkError::MissingQrData(msg)
            | LivelinkError::DuplicateKey(msg)
            | LivelinkError::NotFound(msg)
            | LivelinkError::StorageError(msg)
            | LivelinkError::Config(msg)
            | LivelinkError::Serialization(msg)
            | LivelinkError::SourceError(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            LivelinkError::InvalidInput(_)
            | LivelinkError::ReservedPath(_)
            | LivelinkError::InvalidExpiry(_)
            | LivelinkError::MissingQrData(_)
            | LivelinkError::Serialization(_) => StatusCode::BAD_REQUEST,
            LivelinkError::DuplicateKey(_) => StatusCode::CONFLICT,
            LivelinkError::NotFound(_) => StatusCode::NOT_FOUND,
            LivelinkError::StorageError(_)
            | LivelinkError::Config(_)
            | LivelinkError::SourceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于命令行）
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

impl fmt::Display for LivelinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LivelinkError {}

// 便捷的构造函数
impl LivelinkError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        LivelinkError::InvalidInput(msg.into())
    }

    pub fn reserved_path<T: Into<String>>(msg: T) -> Self {
        LivelinkError::ReservedPath(msg.into())
    }

    pub fn invalid_expiry<T: Into<String>>(msg: T) -> Self {
        LivelinkError::InvalidExpiry(msg.into())
    }

    pub fn missing_qr_data<T: Into<String>>(msg: T) -> Self {
        LivelinkError::MissingQrData(msg.into())
    }

    pub fn duplicate_key<T: Into<String>>(msg: T) -> Self {
        LivelinkError::DuplicateKey(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LivelinkError::NotFound(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        LivelinkError::StorageError(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LivelinkError::Config(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LivelinkError::Serialization(msg.into())
    }

    pub fn source<T: Into<String>>(msg: T) -> Self {
        LivelinkError::SourceError(msg.into())
    }
}

impl From<sea_orm::DbErr> for LivelinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => {
                LivelinkError::DuplicateKey(format!("path already exists: {}", msg))
            }
            _ => LivelinkError::StorageError(err.to_string()),
        }
    }
}

impl From<std::io::Error> for LivelinkError {
    fn from(err: std::io::Error) -> Self {
        LivelinkError::SourceError(err.to_string())
    }
}

impl From<serde_json::Error> for LivelinkError {
    fn from(err: serde_json::Error) -> Self {
        LivelinkError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for LivelinkError {
    fn from(err: redis::RedisError) -> Self {
        LivelinkError::SourceError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LivelinkError>;
