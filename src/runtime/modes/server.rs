//! Server mode
//!
//! Configures and starts the HTTP server with all API routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{error, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, configure};
use crate::config::{ServerConfig, get_config};
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::StartupContext;

/// Build CORS middleware from configuration
///
/// 未配置来源时允许任意来源。
fn build_cors_middleware(server: &ServerConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Accept", "X-Request-ID"])
        .expose_headers(vec!["X-Request-ID"])
        .max_age(3600);

    if server.cors_origins.is_empty() || server.cors_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &server.cors_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let config = get_config();

    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .map_err(|e| {
            error!("Server startup failed: {}", e);
            e
        })?;
    let StartupContext {
        storage,
        recorder,
        analytics_service,
        property_service,
        inquiry_service,
        dashboard_service,
        agent,
    } = startup;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server_config = config.server.clone();
    let db_for_shutdown = storage.get_db().clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware(&server_config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::from(recorder.clone()))
            .app_data(web::Data::from(analytics_service.clone()))
            .app_data(web::Data::from(property_service.clone()))
            .app_data(web::Data::from(inquiry_service.clone()))
            .app_data(web::Data::from(dashboard_service.clone()))
            .app_data(web::Data::from(agent.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(configure)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown: database pool released");
        }
    }

    Ok(())
}
