//! Server mode
//!
//! Builds the shared services, starts the maintenance loops and runs the
//! HTTP server until it stops.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::configure_routes;
use crate::config::get_config;
use crate::services::{ExpiryClock, MaintenanceTask, MappingService, Resolver};
use crate::storage::StorageFactory;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    let storage = StorageFactory::create()
        .await
        .map_err(|e| {
            error!("Server startup failed: {}", e);
            e
        })
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let clock = ExpiryClock::from_offset_minutes(config.maintenance.utc_offset_minutes);
    let mapping_service = Arc::new(MappingService::new(storage.clone()));
    let resolver = Arc::new(Resolver::new(storage.clone(), clock));
    let admin_config = web::Data::new(config.admin.clone());

    if config.admin.password.is_empty() {
        info!("Admin API is disabled (admin.password not set)");
    } else {
        info!("Admin API available at: /api");
    }

    let maintenance = Arc::new(MaintenanceTask::new(
        storage.clone(),
        config.maintenance.clone(),
    ));
    let background = maintenance.spawn_background_tasks();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Using {} CPU cores for the server", cpu_count);
    warn!("Starting server at http://{}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(admin_config.clone())
            .app_data(web::Data::new(mapping_service.clone()))
            .app_data(web::Data::new(resolver.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    let result = server.await;

    for handle in background {
        handle.abort();
    }
    warn!("Server stopped");

    result.context("HTTP server error")
}
