//! Listharvest: a recipe-driven paginated list crawler
//!
//! This crate crawls paginated list pages according to a declarative recipe,
//! extracts item links, follows pagination, deduplicates against persisted
//! state, and resumes incrementally across runs.

pub mod crawler;
pub mod extract;
pub mod output;
pub mod recipe;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for listharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("State error: {0}")]
    State(#[from] storage::StateError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recipe loading and validation errors (fatal at load time)
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Failed to read recipe file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid recipe: {0}")]
    Invalid(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {message}")]
    Parse { url: String, message: String },

    #[error("Failed to resolve '{href}' against '{base}': {message}")]
    Resolve {
        base: String,
        href: String,
        message: String,
    },
}

/// Result type alias for listharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for recipe operations
pub type RecipeResult<T> = std::result::Result<T, RecipeError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crawler::{Fetcher, HttpFetcher, ListCrawler, RunOptions};
pub use recipe::{load_recipe, Pagination, Recipe};
pub use storage::{JsonStateStore, StateStore};
pub use url::{canonicalize, resolve};
