//! 咨询端点

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use super::helpers::{api_result, api_result_with, error_response};
use crate::services::{InquiryService, SubmitInquiryRequest};

/// GET /api/inquiries
pub async fn list_inquiries(service: web::Data<InquiryService>) -> HttpResponse {
    api_result(service.list_all().await, "Failed to fetch inquiries")
}

/// POST /api/inquiries
pub async fn submit_inquiry(
    body: web::Json<SubmitInquiryRequest>,
    service: web::Data<InquiryService>,
) -> HttpResponse {
    api_result_with(
        service.submit(body.into_inner()).await,
        StatusCode::CREATED,
        "Failed to submit inquiry",
    )
}

/// PATCH /api/inquiries/{id}/read
///
/// `isRead` 必须是 JSON 布尔值，字符串 "true" 之类一律拒绝。
pub async fn set_inquiry_read(
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
    service: web::Data<InquiryService>,
) -> HttpResponse {
    let Some(is_read) = body.get("isRead").and_then(serde_json::Value::as_bool) else {
        return error_response(StatusCode::BAD_REQUEST, "isRead must be a boolean value");
    };

    api_result(
        service.set_read(&path.into_inner(), is_read).await,
        "Failed to update inquiry read status",
    )
}
