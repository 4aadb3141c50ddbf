//! Server mode
//!
//! Builds the application components and runs the HTTP server.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use crate::api::routes::{health_routes, links_routes, redirect_routes};
use crate::api::services::AppStartTime;
use crate::config::{CorsConfig, get_config};
use crate::services::{LinkService, ResolverService};
use crate::storage::SeaOrmStore;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors_config.allow_credentials {
        tracing::error!(
            "SECURITY WARNING: allow_any_origin + allow_credentials is a dangerous combination! \
            Any website can make authenticated cross-origin requests. \
            Disabling credentials for safety."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // Disabled CORS falls back to the browser's same-origin policy
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default();

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    if cors_config.allowed_origins.is_empty() {
        // Empty origins = same-origin only
    } else if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors = cors
        .allowed_methods(vec!["GET", "POST", "DELETE", "HEAD"])
        .allowed_header("Content-Type")
        .allowed_header("Accept")
        .max_age(cors_config.max_age as usize);

    // Never combine any-origin with credentials
    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// Run the HTTP server until it exits.
///
/// Logging must be initialized before calling this.
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let config = get_config();

    let store = Arc::new(
        SeaOrmStore::new(&config.database.database_url, &config.database.backend).await?,
    );
    let link_service = Arc::new(LinkService::new(store.clone()));
    let resolver = Arc::new(ResolverService::new(store.clone()));

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.min(32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{} ({} workers)", bind_address, cpu_count);

    HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(resolver.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(64 * 1024))
            .service(
                links_routes().wrap(
                    DefaultHeaders::new()
                        .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
                ),
            )
            .service(health_routes())
            .service(redirect_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count)
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
