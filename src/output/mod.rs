//! Crawl run reporting

mod stats;

pub use stats::CrawlStats;
