//! 浏览统计端点

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::trace;

use super::helpers::{api_error, api_result, message_response};
use crate::analytics::EventRecorder;
use crate::services::AnalyticsService;
use crate::utils::ip::view_metadata;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackViewRequest {
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// POST /api/analytics/track-view
pub async fn track_view(
    req: HttpRequest,
    body: web::Json<TrackViewRequest>,
    recorder: web::Data<EventRecorder>,
) -> HttpResponse {
    let body = body.into_inner();
    let metadata = view_metadata(&req);

    let result = recorder
        .record_view(
            body.property_id.as_deref().unwrap_or_default(),
            body.session_id.as_deref().unwrap_or_default(),
            metadata,
        )
        .await;

    match result {
        Ok(outcome) if outcome.recorded => message_response("View tracked successfully"),
        Ok(_) => {
            trace!("Duplicate view ignored for {:?}", body.property_id);
            message_response("View already tracked today")
        }
        Err(e) => api_error(&e, "Failed to track view"),
    }
}

/// GET /api/analytics/summary
pub async fn get_summary(service: web::Data<AnalyticsService>) -> HttpResponse {
    api_result(service.summary(Utc::now()).await, "Failed to fetch analytics")
}

/// GET /api/properties/{id}/analytics
///
/// 返回 `{views, inquiries, uniqueVisitors}`（全部时间）。未知房源返回
/// 404 `{"error": "Property not found"}`，不返回全零计数；已删除房源同样是 404。
pub async fn get_property_analytics(
    path: web::Path<String>,
    service: web::Data<AnalyticsService>,
) -> HttpResponse {
    let property_id = path.into_inner();
    api_result(
        service.property_analytics(&property_id).await,
        "Failed to fetch property analytics",
    )
}
