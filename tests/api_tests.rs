//! HTTP API integration tests
//!
//! Exercises the full route table with the request-id middleware against a
//! temporary SQLite database.

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::Utc;
use serde_json::{Value, json};
use tempfile::TempDir;

use properview::api::middleware::{REQUEST_ID_HEADER, RequestIdMiddleware};
use properview::api::services::{AppStartTime, configure};
use properview::config::{DatabaseConfig, get_config, init_config};
use properview::runtime::lifetime::startup::StartupContext;
use properview::storage::{Property, PropertyStatus, SeaOrmStorage};

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn setup() -> (TempDir, StartupContext) {
    init_static_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
            .await
            .expect("Failed to create storage"),
    );
    (temp_dir, StartupContext::from_storage(storage, &get_config()))
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($ctx.storage.clone()))
                .app_data(web::Data::from($ctx.recorder.clone()))
                .app_data(web::Data::from($ctx.analytics_service.clone()))
                .app_data(web::Data::from($ctx.property_service.clone()))
                .app_data(web::Data::from($ctx.inquiry_service.clone()))
                .app_data(web::Data::from($ctx.dashboard_service.clone()))
                .app_data(web::Data::from($ctx.agent.clone()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: Utc::now(),
                }))
                .configure(configure),
        )
        .await
    };
}

fn new_property_body() -> Value {
    json!({
        "title": "Maple Court",
        "price": 525000,
        "address": "44 Maple Ct",
        "bedrooms": 4,
        "bathrooms": 2.5,
        "description": "Quiet cul-de-sac",
        "status": "active",
        "imageUrl": "https://img.example.com/maple.jpg"
    })
}

async fn seed_foreign_property(ctx: &StartupContext) -> String {
    let now = Utc::now();
    let property = Property {
        id: "foreign-1".to_string(),
        agent_id: "agent999".to_string(),
        title: "Not yours".to_string(),
        price: 100_000,
        address: "1 Far Away".to_string(),
        bedrooms: 1,
        bathrooms: 1.0,
        description: "Elsewhere".to_string(),
        status: PropertyStatus::Active,
        image_url: None,
        date_listed: now.date_naive(),
        sqft: None,
        property_type: None,
        created_at: now,
        updated_at: now,
    };
    ctx.storage.insert_property(&property).await.unwrap();
    property.id
}

// =============================================================================
// Analytics endpoints
// =============================================================================

#[actix_rt::test]
async fn test_track_view_missing_fields_is_400() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/analytics/track-view")
        .set_json(json!({ "propertyId": "p1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing propertyId or sessionId");
}

#[actix_rt::test]
async fn test_track_view_over_length_session_is_400() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/analytics/track-view")
        .insert_header(("x-forwarded-for", "x".repeat(300)))
        .set_json(json!({ "propertyId": "p1", "sessionId": "s".repeat(200) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "sessionId must be at most 128 characters");
}

#[actix_rt::test]
async fn test_track_view_dedups_per_session() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let track = || {
        TestRequest::post()
            .uri("/api/analytics/track-view")
            .insert_header(("x-forwarded-for", "203.0.113.9, 10.0.0.1"))
            .insert_header(("user-agent", "test-browser"))
            .set_json(json!({ "propertyId": "p1", "sessionId": "s1" }))
            .to_request()
    };

    let body: Value = test::call_and_read_body_json(&app, track()).await;
    assert_eq!(body["message"], "View tracked successfully");

    let body: Value = test::call_and_read_body_json(&app, track()).await;
    assert_eq!(body["message"], "View already tracked today");

    assert_eq!(ctx.storage.property_view_totals("p1").await.unwrap(), (1, 1));
}

#[actix_rt::test]
async fn test_summary_shape() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/api/analytics/summary").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["summary"]["totalViews"], 0);
    assert_eq!(body["summary"]["viewsTrend"], 0.0);
    assert!(body["chartData"].is_array());
    assert!(body["topProperties"].is_array());
    assert_eq!(body["today"]["views"], 0);
}

#[actix_rt::test]
async fn test_property_analytics_endpoint() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);
    let id = seed_foreign_property(&ctx).await;

    let req = TestRequest::post()
        .uri("/api/analytics/track-view")
        .set_json(json!({ "propertyId": id, "sessionId": "s1" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&format!("/api/properties/{}/analytics", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "views": 1, "inquiries": 0, "uniqueVisitors": 1 }));

    let req = TestRequest::get()
        .uri("/api/properties/ghost/analytics")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

// =============================================================================
// Property endpoints
// =============================================================================

#[actix_rt::test]
async fn test_create_and_fetch_property() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/properties")
        .set_json(new_property_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["agentId"], ctx.agent.id.as_str());
    assert_eq!(created["status"], "active");
    assert_eq!(created["imageUrl"], "https://img.example.com/maple.jpg");

    let id = created["id"].as_str().unwrap().to_string();
    let req = TestRequest::get()
        .uri(&format!("/api/properties/{}", id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["title"], "Maple Court");

    let req = TestRequest::get().uri("/api/properties").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let req = TestRequest::get().uri("/api/agent/properties").to_request();
    let own: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own[0]["id"], id.as_str());
}

#[actix_rt::test]
async fn test_create_property_missing_fields_is_400() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/properties")
        .set_json(json!({ "title": "Only a title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Missing required fields: price, address, bedrooms, bathrooms, description, status"
    );
}

#[actix_rt::test]
async fn test_invalid_json_body_is_400() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/properties")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid JSON body");
}

#[actix_rt::test]
async fn test_missing_property_is_404() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/api/properties/ghost").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Property not found" }));

    let req = TestRequest::put()
        .uri("/api/properties/ghost")
        .set_json(json!({ "title": "x" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn test_foreign_property_is_403() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);
    let id = seed_foreign_property(&ctx).await;

    let req = TestRequest::put()
        .uri(&format!("/api/properties/{}", id))
        .set_json(json!({ "status": "sold" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Forbidden: You do not own this property");

    let req = TestRequest::delete()
        .uri(&format!("/api/properties/{}", id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
    assert!(ctx.storage.find_property(&id).await.unwrap().is_some());
}

#[actix_rt::test]
async fn test_update_and_delete_own_property() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/properties")
        .set_json(new_property_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = TestRequest::put()
        .uri(&format!("/api/properties/{}", id))
        .set_json(json!({ "status": "pending", "price": "510000" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "pending");
    assert_eq!(updated["price"], 510000);
    assert_eq!(updated["title"], "Maple Court");

    let req = TestRequest::delete()
        .uri(&format!("/api/properties/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Property deleted");

    let req = TestRequest::get()
        .uri(&format!("/api/properties/{}", id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

// =============================================================================
// Inquiry endpoints
// =============================================================================

#[actix_rt::test]
async fn test_inquiry_lifecycle() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/properties")
        .set_json(new_property_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let property_id = created["id"].as_str().unwrap().to_string();

    let req = TestRequest::post()
        .uri("/api/inquiries")
        .set_json(json!({ "propertyId": property_id, "name": "Ana" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing required fields");

    let req = TestRequest::post()
        .uri("/api/inquiries")
        .set_json(json!({
            "propertyId": "ghost",
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Hi"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = TestRequest::post()
        .uri("/api/inquiries")
        .set_json(json!({
            "propertyId": property_id,
            "name": "Ana",
            "email": "ana@example.com",
            "phone": "555-0199",
            "message": "Is the garage heated?"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let inquiry: Value = test::read_body_json(resp).await;
    assert_eq!(inquiry["isRead"], false);
    let inquiry_id = inquiry["id"].as_str().unwrap().to_string();

    let req = TestRequest::get().uri("/api/inquiries").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list[0]["id"], inquiry_id.as_str());
    assert_eq!(list[0]["property"]["title"], "Maple Court");

    let req = TestRequest::get().uri("/api/agent/inquiries").to_request();
    let own: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own.as_array().unwrap().len(), 1);

    let req = TestRequest::patch()
        .uri(&format!("/api/inquiries/{}/read", inquiry_id))
        .set_json(json!({ "isRead": "true" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "isRead must be a boolean value");

    let req = TestRequest::patch()
        .uri(&format!("/api/inquiries/{}/read", inquiry_id))
        .set_json(json!({ "isRead": true }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["isRead"], true);

    let req = TestRequest::patch()
        .uri("/api/inquiries/ghost/read")
        .set_json(json!({ "isRead": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Inquiry not found");
}

// =============================================================================
// Dashboard & health
// =============================================================================

#[actix_rt::test]
async fn test_dashboard_endpoints() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/properties")
        .set_json(new_property_body())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = TestRequest::get().uri("/api/dashboard/stats").to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["totalListings"], 1);
    assert_eq!(stats["activeListings"], 1);
    assert_eq!(stats["averageTimeOnMarket"], 45);

    let req = TestRequest::get()
        .uri("/api/agent/dashboard/activity")
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed[0]["type"], "listing");
    assert_eq!(feed[0]["description"], "Maple Court was listed");
    assert_eq!(feed[0]["time"], "Just now");
}

#[actix_rt::test]
async fn test_health_check() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["backend"], "sqlite");
}
