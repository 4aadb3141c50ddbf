//! Short-code redirect handler
//!
//! The public face of the service: `GET /{code}` resolves and redirects.
//! Successful redirects carry no-store cache headers — the destination is
//! dynamic and every request must come back here to be re-resolved (and
//! possibly re-counted). 404 bodies stay briefly cacheable.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::services::ResolverService;
use crate::utils::is_valid_code;

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        resolver: web::Data<Arc<ResolverService>>,
    ) -> impl Responder {
        let code = path.into_inner();

        if !is_valid_code(&code) {
            // Syntactically impossible code: no lookup, no registry entry
            trace!("Invalid short code rejected: {}", code);
            return Self::not_found_response();
        }

        match resolver.resolve(&code).await {
            Ok(Some(resolution)) => {
                debug!(
                    "Redirecting '{}' -> '{}' (counted: {})",
                    code, resolution.link.original_url, resolution.counted
                );
                Self::finish_redirect(&resolution.link.original_url)
            }
            Ok(None) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Store error during redirect lookup: {}", e);
                Self::unavailable_response()
            }
        }
    }

    #[inline]
    fn finish_redirect(location: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::FOUND)
            .insert_header(("Location", location))
            .insert_header(("Cache-Control", "no-store, no-cache, must-revalidate"))
            .insert_header(("Pragma", "no-cache"))
            .finish()
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }

    #[inline]
    fn unavailable_response() -> HttpResponse {
        HttpResponse::build(StatusCode::SERVICE_UNAVAILABLE)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Service Unavailable")
    }
}
