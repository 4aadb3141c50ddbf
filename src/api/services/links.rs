//! Link CRUD handlers

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace, warn};

use crate::api::helpers::{created_response, error_from_app, success_response};
use crate::api::types::{
    CreateLinkBody, GetLinksQuery, LinkResponse, PaginatedResponse, PaginationInfo,
};
use crate::errors::LinkcutError;
use crate::services::{CreateLinkRequest, LinkService, ResolverService};

/// GET /links — paginated listing, newest first
pub async fn get_all_links(
    query: web::Query<GetLinksQuery>,
    service: web::Data<Arc<LinkService>>,
) -> ActixResult<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    trace!("API: list links, page {} size {}", page, page_size);

    let (links, total) = match service.list_links(page, page_size).await {
        Ok(result) => result,
        Err(e) => return Ok(error_from_app(&e)),
    };

    let total_pages = total.div_ceil(page_size);
    let data: Vec<LinkResponse> = links.into_iter().map(LinkResponse::from).collect();

    info!(
        "API: returning {} links (page {} of {}, total: {})",
        data.len(),
        page,
        total_pages,
        total
    );

    Ok(HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(PaginatedResponse {
            code: 0,
            data,
            pagination: PaginationInfo {
                page,
                page_size,
                total,
                total_pages,
            },
        }))
}

/// POST /links — create a new link
pub async fn post_link(
    body: web::Json<CreateLinkBody>,
    service: web::Data<Arc<LinkService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    info!(
        "API: create link request - code: {:?}, url: {}",
        body.code, body.url
    );

    let req = CreateLinkRequest {
        code: body.code,
        url: body.url,
    };

    match service.create_link(req).await {
        Ok(result) => Ok(created_response(LinkResponse::from(result.link))),
        Err(e) => {
            warn!("API: create link failed: {}", e);
            Ok(error_from_app(&e))
        }
    }
}

/// GET /links/{code} — link metadata, counted like a redirect
///
/// Serves the SPA's client-side redirect page: it fetches the destination
/// here and navigates itself, so the access is counted through the same
/// cooldown path as a server-side redirect.
pub async fn get_link(
    path: web::Path<String>,
    resolver: web::Data<Arc<ResolverService>>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();

    match resolver.resolve(&code).await {
        Ok(Some(resolution)) => Ok(success_response(LinkResponse::from(resolution.link))),
        Ok(None) => Ok(error_from_app(&LinkcutError::not_found(format!(
            "Link '{}' not found",
            code
        )))),
        Err(e) => Ok(error_from_app(&e)),
    }
}

/// DELETE /links/{id} — idempotent delete
pub async fn delete_link(
    path: web::Path<String>,
    service: web::Data<Arc<LinkService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    match service.delete_link(&id).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(error_from_app(&e)),
    }
}
