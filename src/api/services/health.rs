//! Health check handler

use actix_web::{Responder, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::api::helpers::success_response;
use crate::api::types::{HealthResponse, HealthStorageCheck};
use crate::storage::SeaOrmStore;

#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}

/// GET /healthz
pub async fn health_check(
    storage: web::Data<Arc<SeaOrmStore>>,
    start_time: web::Data<AppStartTime>,
) -> ActixResult<impl Responder> {
    let now = Utc::now();
    let uptime = (now - start_time.start_datetime).num_seconds().max(0) as u64;

    let storage_check = match storage.count_links().await {
        Ok(count) => HealthStorageCheck {
            status: "healthy".to_string(),
            links_count: Some(count),
            backend: storage.backend_name().to_string(),
            error: None,
        },
        Err(e) => HealthStorageCheck {
            status: "unhealthy".to_string(),
            links_count: None,
            backend: storage.backend_name().to_string(),
            error: Some(e.to_string()),
        },
    };

    let status = if storage_check.status == "healthy" {
        "ok"
    } else {
        "degraded"
    };

    Ok(success_response(HealthResponse {
        status: status.to_string(),
        timestamp: now.to_rfc3339(),
        uptime,
        storage: storage_check,
    }))
}
