//! 房源 CRUD 端点

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::info;

use super::helpers::{api_error, api_result, api_result_with, message_response};
use crate::services::{CreatePropertyRequest, PropertyService, UpdatePropertyRequest};
use crate::storage::CurrentAgent;

/// GET /api/properties
pub async fn list_properties(service: web::Data<PropertyService>) -> HttpResponse {
    api_result(service.list_active().await, "Failed to fetch properties")
}

/// POST /api/properties
pub async fn create_property(
    body: web::Json<CreatePropertyRequest>,
    agent: web::Data<CurrentAgent>,
    service: web::Data<PropertyService>,
) -> HttpResponse {
    let result = service.create(&agent, body.into_inner()).await;
    if let Ok(ref property) = result {
        info!("Property created: {} by {}", property.id, agent.id);
    }
    api_result_with(result, StatusCode::CREATED, "Failed to create property")
}

/// GET /api/properties/{id}
pub async fn get_property(
    path: web::Path<String>,
    service: web::Data<PropertyService>,
) -> HttpResponse {
    api_result(service.get(&path.into_inner()).await, "Failed to fetch property")
}

/// PUT /api/properties/{id}
pub async fn update_property(
    path: web::Path<String>,
    body: web::Json<UpdatePropertyRequest>,
    agent: web::Data<CurrentAgent>,
    service: web::Data<PropertyService>,
) -> HttpResponse {
    api_result(
        service
            .update(&agent, &path.into_inner(), body.into_inner())
            .await,
        "Failed to update property",
    )
}

/// DELETE /api/properties/{id}
pub async fn delete_property(
    path: web::Path<String>,
    agent: web::Data<CurrentAgent>,
    service: web::Data<PropertyService>,
) -> HttpResponse {
    match service.delete(&agent, &path.into_inner()).await {
        Ok(()) => message_response("Property deleted"),
        Err(e) => api_error(&e, "Failed to delete property"),
    }
}
