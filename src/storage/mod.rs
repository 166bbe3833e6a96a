//! Persisted crawl state
//!
//! Two seen-sets of canonical URLs (list pages, item links) backed by JSON
//! snapshots, plus two append-only JSONL logs (items, list pages). The
//! seen-sets are the authority for what to skip; the logs are the
//! authoritative history and are written at-least-once across crash
//! boundaries.

mod json;
mod traits;

pub use json::JsonStateStore;
pub use traits::{StateError, StateResult, StateStore};

use serde::{Deserialize, Serialize};

/// One discovered item, appended to `items.jsonl` on first sighting.
///
/// Never rewritten or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Canonical item URL
    pub url: String,

    /// Trimmed visible link text
    pub text: String,

    /// Canonical URL of the list page the item was found on
    pub source_page: String,

    /// RFC 3339 UTC timestamp of first sighting
    pub timestamp: String,
}

/// One page-processing attempt, appended to `list_pages.jsonl`.
///
/// Every attempt is logged, including failures; entries are never
/// rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPageLogEntry {
    pub url: String,
    pub status: PageStatus,
    pub items_found: usize,
    pub pagination_found: usize,
    pub timestamp: String,
}

/// Outcome of a page-processing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PageStatus::Success).unwrap(), "\"success\"");
        assert_eq!(serde_json::to_string(&PageStatus::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_item_record_roundtrip() {
        let record = ItemRecord {
            url: "https://x.test/item/1".to_string(),
            text: "First".to_string(),
            source_page: "https://x.test/list".to_string(),
            timestamp: "2024-05-01T12:00:00Z".to_string(),
        };

        let line = serde_json::to_string(&record).unwrap();
        let parsed: ItemRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.url, record.url);
        assert_eq!(parsed.source_page, record.source_page);
    }
}
