//! CSV export handler

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::helpers::error_from_app;
use crate::services::LinkService;
use crate::utils::csv_export::{export_filename, links_to_csv};

/// GET /links/export/csv — all links as a CSV attachment
pub async fn export_links_csv(
    service: web::Data<Arc<LinkService>>,
) -> ActixResult<impl Responder> {
    let links = match service.export_links().await {
        Ok(links) => links,
        Err(e) => {
            error!("API: export failed: {}", e);
            return Ok(error_from_app(&e));
        }
    };

    let body = match links_to_csv(&links) {
        Ok(body) => body,
        Err(e) => {
            error!("API: CSV generation failed: {}", e);
            return Ok(error_from_app(&e));
        }
    };

    info!("API: exported {} links as CSV", links.len());

    Ok(HttpResponse::Ok()
        .insert_header(("Content-Type", "text/csv; charset=utf-8"))
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", export_filename()),
        ))
        .body(body))
}
