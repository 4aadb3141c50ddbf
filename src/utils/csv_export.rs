//! CSV export
//!
//! Renders all links to a spreadsheet-friendly CSV: UTF-8 with a byte-order
//! mark, RFC-4180 quoting (fields containing comma/quote/newline are wrapped
//! in double quotes, internal quotes doubled).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{LinkcutError, Result};
use crate::storage::Link;

/// UTF-8 BOM so spreadsheet software detects the encoding.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One CSV row. Column order matters for the exported header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvLinkRow {
    pub id: String,
    pub code: String,
    pub original_url: String,
    pub access_count: u64,
    pub created_at: String,
}

impl From<&Link> for CsvLinkRow {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            code: link.code.clone(),
            original_url: link.original_url.clone(),
            access_count: link.access_count,
            created_at: link.created_at.to_rfc3339(),
        }
    }
}

/// Serialize links to CSV bytes, BOM and header included.
pub fn links_to_csv(links: &[Link]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(UTF8_BOM.len() + links.len() * 64);
    buf.extend_from_slice(UTF8_BOM);

    let mut writer = csv::WriterBuilder::new().from_writer(buf);

    for link in links {
        writer
            .serialize(CsvLinkRow::from(link))
            .map_err(|e| LinkcutError::serialization(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| LinkcutError::serialization(format!("Failed to finalize CSV: {}", e)))
}

/// Default export filename with a timestamp.
pub fn export_filename() -> String {
    format!("links_export_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"))
}
