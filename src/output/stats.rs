//! Run statistics
//!
//! Counters accumulated by the coordinator over a single crawl run and
//! reported in the end-of-run summary. These are per-run numbers; the
//! persisted seen-sets carry the cross-run totals.

/// Counters for a single crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched and processed successfully
    pub pages_visited: u64,

    /// Pages skipped because they were already seen
    pub pages_skipped: u64,

    /// Pages whose fetch failed
    pub pages_failed: u64,

    /// Unique items discovered this run
    pub items_discovered: u64,

    /// Pagination links extracted (before dedup)
    pub pagination_links_found: u64,
}

impl CrawlStats {
    /// Logs the end-of-run summary
    pub fn log_summary(&self) {
        tracing::info!("{}", "=".repeat(60));
        tracing::info!("List crawl complete!");
        tracing::info!("List pages visited: {}", self.pages_visited);
        tracing::info!("List pages skipped: {}", self.pages_skipped);
        if self.pages_failed > 0 {
            tracing::info!("List pages failed: {}", self.pages_failed);
        }
        tracing::info!("Items discovered: {}", self.items_discovered);
        tracing::info!("Pagination links found: {}", self.pagination_links_found);
        tracing::info!("{}", "=".repeat(60));
    }
}
