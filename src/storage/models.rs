use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored short link.
///
/// `id` is assigned at creation and never changes; `code` is the public
/// lookup key, unique across all links; `access_count` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub access_count: u64,
}
