//! State-store trait and error types

use crate::storage::PageStatus;
use thiserror::Error;

/// Errors that can occur during state persistence
#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for state operations
pub type StateResult<T> = Result<T, StateError>;

/// Interface for crawl-state persistence backends
///
/// All URLs passed in are expected to be canonical. The trait keeps the
/// orchestrator independent of the backing format, so the JSON-file
/// implementation could be swapped for an embedded database without
/// touching the crawl loop.
pub trait StateStore {
    /// Checks whether a list page URL has already been processed
    fn has_seen_list_page(&self, url: &str) -> bool;

    /// Marks a list page URL as processed
    fn mark_list_page_seen(&mut self, url: &str);

    /// Checks whether an item URL has already been discovered
    fn has_seen_item(&self, url: &str) -> bool;

    /// Records an item on first sighting
    ///
    /// No-op if the URL is already seen; otherwise marks it seen and
    /// appends exactly one log entry with a fresh timestamp.
    fn add_item(&mut self, url: &str, text: &str, source_page: &str) -> StateResult<()>;

    /// Appends a page-processing attempt to the audit log
    ///
    /// Always appends, regardless of prior state; this is the history,
    /// not the dedup mechanism.
    fn append_list_page_log(
        &mut self,
        url: &str,
        status: PageStatus,
        items_found: usize,
        pagination_found: usize,
    ) -> StateResult<()>;

    /// Number of list pages marked seen
    fn seen_list_page_count(&self) -> usize;

    /// Number of items discovered
    fn seen_item_count(&self) -> usize;

    /// Durably persists the seen-sets (logs are already durable; they are
    /// appended on every call)
    fn save(&mut self) -> StateResult<()>;

    /// Empties both seen-sets and deletes their persisted snapshots
    fn clear(&mut self) -> StateResult<()>;
}
