use crate::extract::{is_skippable_href, parse_selector, ExtractResult};
use crate::url::resolve;
use scraper::Html;

/// An item link extracted from a list page (not yet canonicalized)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLink {
    /// Absolute URL, resolved against the list page URL
    pub url: String,

    /// Trimmed visible link text
    pub text: String,
}

/// Extracts item links from a list page
///
/// Selects every element matching `scope_css` (one per repeating item
/// container), then every element matching `item_link_css` within each
/// container. Anchors with an empty href, or one beginning with `#`,
/// `javascript:`, or `mailto:`, are skipped; the rest are resolved against
/// `base_url`. Results follow document order of scopes, then document order
/// of links within a scope.
///
/// # Example
///
/// ```
/// use listharvest::extract::extract_item_links;
///
/// let html = r#"<div class="quote"><a href="/author/a">A</a></div>"#;
/// let items = extract_item_links(html, "https://x.test/", "div.quote", "a[href]").unwrap();
/// assert_eq!(items[0].url, "https://x.test/author/a");
/// ```
pub fn extract_item_links(
    html: &str,
    base_url: &str,
    scope_css: &str,
    item_link_css: &str,
) -> ExtractResult<Vec<ItemLink>> {
    let document = Html::parse_document(html);
    let scope_selector = parse_selector(scope_css)?;
    let link_selector = parse_selector(item_link_css)?;

    let mut items = Vec::new();

    for scope in document.select(&scope_selector) {
        for link in scope.select(&link_selector) {
            let href = link.value().attr("href").unwrap_or("").trim();

            if is_skippable_href(href) {
                continue;
            }

            let absolute_url = match resolve(base_url, href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping unresolvable href '{}': {}", href, e);
                    continue;
                }
            };

            let text = link.text().collect::<String>().trim().to_string();

            items.push(ItemLink {
                url: absolute_url,
                text,
            });
        }
    }

    Ok(items)
}
