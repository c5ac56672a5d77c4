//! 处理函数共用的响应构造

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use crate::errors::{ProperviewError, Result};

/// `{"error": message}`
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(json!({ "error": message }))
}

/// `{"message": message}`
pub fn message_response(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": message }))
}

/// 把服务层错误映射为 HTTP 响应
///
/// 4xx 原样返回错误消息；其余错误记录日志后返回 `internal_message`。
pub fn api_error(err: &ProperviewError, internal_message: &str) -> HttpResponse {
    if err.is_client_error() {
        return error_response(err.http_status(), err.message());
    }
    error!("{}: {}", internal_message, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, internal_message)
}

/// 成功时返回 `status` + JSON
pub fn api_result_with<T: Serialize>(
    result: Result<T>,
    status: StatusCode,
    internal_message: &str,
) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::build(status).json(data),
        Err(e) => api_error(&e, internal_message),
    }
}

pub fn api_result<T: Serialize>(result: Result<T>, internal_message: &str) -> HttpResponse {
    api_result_with(result, StatusCode::OK, internal_message)
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected JSON body for {}: {}", req.path(), err);
    let response = error_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
    actix_web::error::InternalError::from_response(err, response).into()
}

/// JSON 请求体配置：解析失败时也返回 `{"error"}` 格式
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(json_error_handler)
}
