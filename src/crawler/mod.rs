//! Crawl orchestration
//!
//! The coordinator owns the page queue and drives fetching, extraction,
//! and state updates; the fetcher is the pluggable transport underneath it.

mod coordinator;
mod fetcher;

pub use coordinator::{run_list_crawl, ListCrawler, RunOptions};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
