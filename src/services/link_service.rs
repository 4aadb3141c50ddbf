//! Link management service
//!
//! Business logic for link CRUD: validation, code generation, pagination
//! clamps. Handlers stay thin; everything that must hold across interfaces
//! lives here.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{LinkcutError, Result};
use crate::storage::{Link, SeaOrmStore};
use crate::utils::url_validator::validate_url;
use crate::utils::{generate_random_code, is_reserved_code, is_valid_code};

/// Generated codes are 6 chars, like the original service's hex codes.
const RANDOM_CODE_LENGTH: usize = 6;

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Short code (optional, generated when not provided)
    pub code: Option<String>,
    /// Destination URL
    pub url: String,
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    pub link: Link,
    /// Whether the code was auto-generated
    pub generated_code: bool,
}

pub struct LinkService {
    store: Arc<SeaOrmStore>,
}

impl LinkService {
    pub fn new(store: Arc<SeaOrmStore>) -> Self {
        Self { store }
    }

    /// Create a new short link.
    ///
    /// The destination must be a well-formed http(s) URL. A caller-supplied
    /// code must pass the format check and not collide with a served route;
    /// a duplicate code fails with a conflict, never an overwrite.
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<LinkCreateResult> {
        validate_url(&req.url).map_err(|e| LinkcutError::validation(e.to_string()))?;

        let (code, generated) = match req.code.filter(|c| !c.is_empty()) {
            Some(c) => {
                if !is_valid_code(&c) {
                    return Err(LinkcutError::validation(format!(
                        "Invalid short code '{}'. Use 3-64 letters, digits, underscore or hyphen.",
                        c
                    )));
                }
                if is_reserved_code(&c) {
                    return Err(LinkcutError::validation(format!(
                        "Short code '{}' conflicts with a reserved route",
                        c
                    )));
                }
                (c, false)
            }
            None => (generate_random_code(RANDOM_CODE_LENGTH), true),
        };

        let link = self.store.insert(&code, &req.url).await?;

        info!(
            "LinkService: created link '{}' -> '{}'",
            link.code, link.original_url
        );

        Ok(LinkCreateResult {
            link,
            generated_code: generated,
        })
    }

    /// Get a single link by code, without counting an access.
    pub async fn get_link(&self, code: &str) -> Result<Option<Link>> {
        self.store.find_by_code(code).await
    }

    /// List links with pagination, newest first. Returns `(items, total)`.
    pub async fn list_links(&self, page: u64, page_size: u64) -> Result<(Vec<Link>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        self.store.list_paginated(page, page_size).await
    }

    /// Delete a link by id. Deleting an absent id is a no-op.
    pub async fn delete_link(&self, id: &str) -> Result<()> {
        let removed = self.store.remove(id).await?;

        if removed == 0 {
            debug!("LinkService: delete for unknown id '{}', nothing to do", id);
        } else {
            info!("LinkService: deleted '{}'", id);
        }

        Ok(())
    }

    /// Export all links, newest first.
    pub async fn export_links(&self) -> Result<Vec<Link>> {
        let links = self.store.load_all().await?;
        info!("LinkService: exported {} links", links.len());
        Ok(links)
    }
}
