use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ProperviewError {
    Validation(String),
    NotFound(String),
    Forbidden(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
    DateParse(String),
    FileOperation(String),
}

impl ProperviewError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ProperviewError::Validation(_) => "E001",
            ProperviewError::NotFound(_) => "E002",
            ProperviewError::Forbidden(_) => "E003",
            ProperviewError::DatabaseConfig(_) => "E004",
            ProperviewError::DatabaseConnection(_) => "E005",
            ProperviewError::DatabaseOperation(_) => "E006",
            ProperviewError::Serialization(_) => "E007",
            ProperviewError::DateParse(_) => "E008",
            ProperviewError::FileOperation(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ProperviewError::Validation(_) => "Validation Error",
            ProperviewError::NotFound(_) => "Resource Not Found",
            ProperviewError::Forbidden(_) => "Forbidden",
            ProperviewError::DatabaseConfig(_) => "Database Configuration Error",
            ProperviewError::DatabaseConnection(_) => "Database Connection Error",
            ProperviewError::DatabaseOperation(_) => "Database Operation Error",
            ProperviewError::Serialization(_) => "Serialization Error",
            ProperviewError::DateParse(_) => "Date Parse Error",
            ProperviewError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ProperviewError::Validation(msg)
            | ProperviewError::NotFound(msg)
            | ProperviewError::Forbidden(msg)
            | ProperviewError::DatabaseConfig(msg)
            | ProperviewError::DatabaseConnection(msg)
            | ProperviewError::DatabaseOperation(msg)
            | ProperviewError::Serialization(msg)
            | ProperviewError::DateParse(msg)
            | ProperviewError::FileOperation(msg) => msg,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ProperviewError::Validation(_) => StatusCode::BAD_REQUEST,
            ProperviewError::NotFound(_) => StatusCode::NOT_FOUND,
            ProperviewError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否为客户端错误（消息可以原样返回给调用方）
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于启动失败时打印到终端）
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

impl fmt::Display for ProperviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ProperviewError {}

// 便捷的构造函数
impl ProperviewError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ProperviewError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ProperviewError::NotFound(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        ProperviewError::Forbidden(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ProperviewError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ProperviewError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ProperviewError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ProperviewError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        ProperviewError::DateParse(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ProperviewError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ProperviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProperviewError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ProperviewError {
    fn from(err: std::io::Error) -> Self {
        ProperviewError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ProperviewError {
    fn from(err: serde_json::Error) -> Self {
        ProperviewError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ProperviewError {
    fn from(err: chrono::ParseError) -> Self {
        ProperviewError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProperviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ProperviewError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProperviewError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProperviewError::forbidden("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ProperviewError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProperviewError::date_parse("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_error_flag() {
        assert!(ProperviewError::validation("bad").is_client_error());
        assert!(!ProperviewError::database_connection("down").is_client_error());
    }

    #[test]
    fn test_format_simple() {
        let err = ProperviewError::not_found("Property not found");
        assert_eq!(err.format_simple(), "Resource Not Found: Property not found");
        assert_eq!(err.to_string(), err.format_simple());
        assert_eq!(err.code(), "E002");
    }

    #[test]
    fn test_from_db_err() {
        let err: ProperviewError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, ProperviewError::DatabaseOperation(_)));
        assert!(err.message().contains("boom"));
    }
}
