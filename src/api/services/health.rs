use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::storage::SeaOrmStorage;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub backend: String,
    pub uptime: u64,
    pub response_time_ms: u64,
}

/// GET /health
///
/// 数据库 ping 通过返回 200，否则 503。
pub async fn health_check(
    storage: web::Data<Arc<SeaOrmStorage>>,
    app_start_time: web::Data<AppStartTime>,
) -> HttpResponse {
    let start_time = Instant::now();
    trace!("Received health check request");

    let database = match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, storage.ping()).await {
        Ok(Ok(())) => "connected".to_string(),
        Ok(Err(e)) => {
            error!("Database health check failed: {}", e);
            "error".to_string()
        }
        Err(_) => {
            error!("Database health check timeout");
            "timeout".to_string()
        }
    };
    let healthy = database == "connected";

    let now = chrono::Utc::now();
    let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        database,
        backend: storage.backend_name().to_string(),
        uptime,
        response_time_ms: start_time.elapsed().as_millis() as u64,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    HttpResponse::build(status).json(body)
}
