//! 当前经纪人视角的端点

use actix_web::{HttpResponse, web};
use chrono::Utc;

use super::helpers::api_result;
use crate::services::{DashboardService, InquiryService, PropertyService};
use crate::storage::CurrentAgent;

/// GET /api/agent/properties
pub async fn agent_properties(
    agent: web::Data<CurrentAgent>,
    service: web::Data<PropertyService>,
) -> HttpResponse {
    api_result(
        service.list_for_agent(&agent).await,
        "Failed to fetch agent properties",
    )
}

/// GET /api/agent/inquiries
pub async fn agent_inquiries(
    agent: web::Data<CurrentAgent>,
    service: web::Data<InquiryService>,
) -> HttpResponse {
    api_result(
        service.list_for_agent(&agent).await,
        "Failed to fetch inquiries",
    )
}

/// GET /api/agent/dashboard/activity
pub async fn agent_activity(
    agent: web::Data<CurrentAgent>,
    service: web::Data<DashboardService>,
) -> HttpResponse {
    api_result(
        service.recent_activity(&agent, Utc::now()).await,
        "Failed to fetch dashboard activity",
    )
}

/// GET /api/dashboard/stats
pub async fn dashboard_stats(service: web::Data<DashboardService>) -> HttpResponse {
    api_result(
        service.stats(Utc::now()).await,
        "Failed to fetch dashboard statistics",
    )
}
