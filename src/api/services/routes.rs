//! 路由配置
//!
//! - /api/analytics: 浏览上报与汇总
//! - /api/properties: 房源 CRUD 和单房源统计
//! - /api/inquiries: 咨询提交、列表、已读标记
//! - /api/agent: 当前经纪人的房源、咨询和动态
//! - /api/dashboard: 仪表盘统计
//! - /health

use actix_web::web;

use super::agent::{agent_activity, agent_inquiries, agent_properties, dashboard_stats};
use super::analytics::{get_property_analytics, get_summary, track_view};
use super::health::health_check;
use super::helpers::json_config;
use super::inquiries::{list_inquiries, set_inquiry_read, submit_inquiry};
use super::properties::{
    create_property, delete_property, get_property, list_properties, update_property,
};

pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics")
        .route("/track-view", web::post().to(track_view))
        .route("/summary", web::get().to(get_summary))
}

pub fn properties_routes() -> actix_web::Scope {
    web::scope("/properties")
        .route("", web::get().to(list_properties))
        .route("", web::post().to(create_property))
        .route("/{id}/analytics", web::get().to(get_property_analytics))
        .route("/{id}", web::get().to(get_property))
        .route("/{id}", web::put().to(update_property))
        .route("/{id}", web::delete().to(delete_property))
}

pub fn inquiries_routes() -> actix_web::Scope {
    web::scope("/inquiries")
        .route("", web::get().to(list_inquiries))
        .route("", web::post().to(submit_inquiry))
        .route("/{id}/read", web::patch().to(set_inquiry_read))
}

pub fn agent_routes() -> actix_web::Scope {
    web::scope("/agent")
        .route("/properties", web::get().to(agent_properties))
        .route("/inquiries", web::get().to(agent_inquiries))
        .route("/dashboard/activity", web::get().to(agent_activity))
}

pub fn dashboard_routes() -> actix_web::Scope {
    web::scope("/dashboard").route("/stats", web::get().to(dashboard_stats))
}

/// 注册全部路由，服务端和测试共用
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/api")
                .service(analytics_routes())
                .service(properties_routes())
                .service(inquiries_routes())
                .service(agent_routes())
                .service(dashboard_routes()),
        )
        .route("/health", web::get().to(health_check));
}
