//! Short-code resolution and access counting
//!
//! The hot path of the service: look the code up, decide whether this
//! resolution counts as a fresh access, and hand the destination back to the
//! HTTP layer. Counting is best-effort; resolution is not.

use std::sync::Arc;
use tracing::{debug, error};

use crate::errors::Result;
use crate::services::cooldown::CooldownRegistry;
use crate::storage::{Link, SeaOrmStore};

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub link: Link,
    /// Whether this resolution incremented the access counter.
    pub counted: bool,
}

pub struct ResolverService {
    store: Arc<SeaOrmStore>,
    cooldown: CooldownRegistry,
}

impl ResolverService {
    pub fn new(store: Arc<SeaOrmStore>) -> Self {
        Self {
            store,
            cooldown: CooldownRegistry::new(),
        }
    }

    /// Construct with an explicit registry (used by tests to shrink windows).
    pub fn with_cooldown(store: Arc<SeaOrmStore>, cooldown: CooldownRegistry) -> Self {
        Self { store, cooldown }
    }

    /// Resolve a short code to its destination.
    ///
    /// Returns `Ok(None)` for an unknown code; the cooldown registry is not
    /// touched in that case. Store failures propagate to the caller.
    ///
    /// When the cooldown claim succeeds the counter increment is attempted;
    /// if the increment fails the resolution still succeeds with
    /// `counted = false` — redirect correctness outranks analytics accuracy.
    pub async fn resolve(&self, code: &str) -> Result<Option<Resolution>> {
        let Some(link) = self.store.find_by_code(code).await? else {
            debug!("Short code not found: {}", code);
            return Ok(None);
        };

        if !self.cooldown.try_claim(&link.id) {
            debug!("Access within cooldown window, not counted: {}", code);
            return Ok(Some(Resolution {
                link,
                counted: false,
            }));
        }

        match self.store.increment_access_count(&link.id).await {
            Ok(updated) => Ok(Some(Resolution {
                link: updated,
                counted: true,
            })),
            Err(e) => {
                error!("Failed to increment access count for '{}': {}", code, e);
                Ok(Some(Resolution {
                    link,
                    counted: false,
                }))
            }
        }
    }

    /// Registry size, exposed for tests and the health probe.
    pub fn cooldown_entries(&self) -> usize {
        self.cooldown.len()
    }
}
