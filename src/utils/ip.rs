//! 请求来源信息提取
//!
//! 客户端 IP 取 X-Forwarded-For 的第一个地址，其次 X-Real-IP，都没有时为 "unknown"。
//! 超过列长度的值视为无效，继续回退。

use actix_web::HttpRequest;
use actix_web::http::header::{self, HeaderMap};

use super::limits::MAX_IP_LEN;
use crate::analytics::ViewMetadata;

pub const UNKNOWN_IP: &str = "unknown";

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    // 优先 X-Forwarded-For（取第一个，即原始客户端 IP）
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| usable_ip(s))
        .or_else(|| {
            // 其次 X-Real-IP
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| usable_ip(s))
        })
}

fn usable_ip(s: &str) -> bool {
    !s.is_empty() && s.chars().count() <= MAX_IP_LEN
}

/// 客户端 IP，无法识别时返回 "unknown"
pub fn client_ip(headers: &HeaderMap) -> String {
    extract_forwarded_ip_from_headers(headers).unwrap_or_else(|| UNKNOWN_IP.to_string())
}

fn header_or_empty(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// 构造浏览事件的元数据
pub fn view_metadata(req: &HttpRequest) -> ViewMetadata {
    let headers = req.headers();
    ViewMetadata {
        user_agent: header_or_empty(headers, header::USER_AGENT),
        ip_address: client_ip(headers),
        referrer: header_or_empty(headers, header::REFERER),
    }
}
