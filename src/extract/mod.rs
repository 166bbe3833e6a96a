//! Pure extraction functions for list pages
//!
//! These functions turn an HTML document plus recipe rules into item links
//! and pagination links. They perform no I/O and no deduplication; dedup is
//! a state-store responsibility.

mod items;
mod pagination;

pub use items::{extract_item_links, ItemLink};
pub use pagination::extract_pagination_links;

use scraper::{Html, Selector};
use thiserror::Error;

/// Errors raised during extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("URL error: {0}")]
    Url(#[from] crate::UrlError),
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Compiles a CSS selector, mapping the parse error into [`ExtractError`]
///
/// Recipes validate their selectors at load time, so this failing here
/// means the selector came from somewhere else (or the recipe bypassed
/// `load_recipe`).
pub(crate) fn parse_selector(selector: &str) -> ExtractResult<Selector> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Counts how many elements in `html` match `selector`
///
/// Diagnostic helper for verbose logging only; an invalid selector counts
/// as zero matches. Has no effect on crawl semantics.
pub fn count_selector_matches(html: &str, selector: &str) -> usize {
    let document = Html::parse_document(html);
    match Selector::parse(selector) {
        Ok(sel) => document.select(&sel).count(),
        Err(_) => 0,
    }
}

/// Shared href skip rules: empty, fragment-only, javascript:, mailto:
pub(crate) fn is_skippable_href(href: &str) -> bool {
    href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_selector_matches() {
        let html = r#"<div class="q"><a href="/1">1</a></div><div class="q"></div>"#;
        assert_eq!(count_selector_matches(html, "div.q"), 2);
        assert_eq!(count_selector_matches(html, "span"), 0);
    }

    #[test]
    fn test_count_with_invalid_selector_is_zero() {
        assert_eq!(count_selector_matches("<div></div>", "div[["), 0);
    }

    #[test]
    fn test_skippable_hrefs() {
        assert!(is_skippable_href(""));
        assert!(is_skippable_href("#frag"));
        assert!(is_skippable_href("javascript:void(0)"));
        assert!(is_skippable_href("mailto:a@b.com"));
        assert!(!is_skippable_href("/valid"));
        assert!(!is_skippable_href("https://x.test/p"));
    }
}
