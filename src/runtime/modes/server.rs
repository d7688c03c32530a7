//! Server mode
//!
//! This module contains the HTTP server startup logic.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::api::{AppState, configure_routes};
use crate::config::{AppConfig, StorageBackendKind};
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &AppConfig) -> Result<()> {
    let registry = lifetime::startup::prepare_registry(config)
        .await
        .map_err(|e| {
            error!("Server startup failed: {}", e);
            e
        })?;

    if config.storage.backend_kind()? == StorageBackendKind::Memory {
        warn!("Memory storage selected: links are lost when the server stops");
    }

    let state = AppState::new(registry, config.server.base_url.clone());
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting server at http://{}", bind_address);
    server.run().await.context("HTTP server stopped with an error")?;

    info!("Server stopped");
    Ok(())
}
