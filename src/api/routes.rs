//! Route composition

use actix_web::web;

use crate::api::services::export::export_links_csv;
use crate::api::services::health::health_check;
use crate::api::services::links::{delete_link, get_all_links, get_link, post_link};
use crate::api::services::redirect::RedirectService;

/// Link management routes under `/links`
///
/// - GET /links — paginated listing
/// - POST /links — create
/// - GET /links/export/csv — CSV export (before the `{code}` wildcard)
/// - GET /links/{code} — counted metadata lookup
/// - DELETE /links/{id} — idempotent delete
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(get_all_links))
        .route("", web::head().to(get_all_links))
        .route("", web::post().to(post_link))
        // Export must be registered before /{code}
        .route("/export/csv", web::get().to(export_links_csv))
        .route("/{code}", web::get().to(get_link))
        .route("/{id}", web::delete().to(delete_link))
}

/// Health route `/healthz`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/healthz").route("", web::get().to(health_check))
}

/// Root-level redirect catch-all; register last.
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
