use crate::extract::{is_skippable_href, parse_selector, ExtractResult};
use crate::recipe::Pagination;
use crate::url::resolve;
use crate::UrlError;
use scraper::Html;
use url::Url;

/// Extracts pagination links according to the recipe's strategy
///
/// - [`Pagination::Next`]: the single element matching `next_css`; zero or
///   one result.
/// - [`Pagination::AllLinks`]: every anchor inside the container matching
///   `pagination_scope_css`, filtered to the base URL's host and to paths
///   with at least as many segments as the base path minus one (admits
///   pagination variants of the same path, excludes unrelated same-host
///   links).
/// - [`Pagination::UrlTemplate`]: ignores the HTML and generates one URL
///   per page number in `[page_start, page_end]` by rewriting the
///   `page_param` query parameter of `base_url`.
pub fn extract_pagination_links(
    html: &str,
    base_url: &str,
    pagination: &Pagination,
) -> ExtractResult<Vec<String>> {
    match pagination {
        Pagination::Next { next_css } => extract_next(html, base_url, next_css),
        Pagination::AllLinks {
            pagination_scope_css,
        } => extract_all_links(html, base_url, pagination_scope_css),
        Pagination::UrlTemplate {
            page_param,
            page_start,
            page_end,
        } => generate_template_urls(base_url, page_param, *page_start, *page_end),
    }
}

/// Follows a single "next page" link
fn extract_next(html: &str, base_url: &str, next_css: &str) -> ExtractResult<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = parse_selector(next_css)?;

    let Some(element) = document.select(&selector).next() else {
        return Ok(Vec::new());
    };

    let href = element.value().attr("href").unwrap_or("").trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return Ok(Vec::new());
    }

    match resolve(base_url, href) {
        Ok(url) => Ok(vec![url]),
        Err(e) => {
            tracing::debug!("Skipping unresolvable next href '{}': {}", href, e);
            Ok(Vec::new())
        }
    }
}

/// Collects every plausible pagination link inside a container
fn extract_all_links(html: &str, base_url: &str, scope_css: &str) -> ExtractResult<Vec<String>> {
    let document = Html::parse_document(html);
    let scope_selector = parse_selector(scope_css)?;
    let anchor_selector = parse_selector("a[href]")?;

    let Some(container) = document.select(&scope_selector).next() else {
        return Ok(Vec::new());
    };

    let base = parse_base(base_url)?;
    let base_segments = path_segment_count(base.path());

    let mut urls = Vec::new();

    for link in container.select(&anchor_selector) {
        let href = link.value().attr("href").unwrap_or("").trim();

        if is_skippable_href(href) {
            continue;
        }

        let absolute_url = match resolve(base_url, href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping unresolvable pagination href '{}': {}", href, e);
                continue;
            }
        };

        let Ok(parsed) = Url::parse(&absolute_url) else {
            continue;
        };

        if parsed.host_str() != base.host_str()
            || parsed.port_or_known_default() != base.port_or_known_default()
        {
            continue;
        }

        // Heuristic: a pagination variant keeps roughly the same path depth
        if path_segment_count(parsed.path()) >= base_segments.saturating_sub(1) {
            urls.push(absolute_url);
        }
    }

    Ok(urls)
}

/// Generates page URLs by rewriting the page query parameter
///
/// The first occurrence of `page_param` is replaced (later occurrences are
/// dropped); if absent, the parameter is appended. All other query
/// parameters are left untouched.
fn generate_template_urls(
    base_url: &str,
    page_param: &str,
    page_start: u32,
    page_end: u32,
) -> ExtractResult<Vec<String>> {
    let base = parse_base(base_url)?;

    let pairs: Vec<(String, String)> = base
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut urls = Vec::with_capacity((page_end.saturating_sub(page_start) + 1) as usize);

    for page in page_start..=page_end {
        let mut url = base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.clear();

            let mut replaced = false;
            for (key, value) in &pairs {
                if key == page_param {
                    if !replaced {
                        query.append_pair(key, &page.to_string());
                        replaced = true;
                    }
                } else {
                    query.append_pair(key, value);
                }
            }

            if !replaced {
                query.append_pair(page_param, &page.to_string());
            }
        }
        urls.push(url.to_string());
    }

    Ok(urls)
}

fn parse_base(base_url: &str) -> ExtractResult<Url> {
    Url::parse(base_url).map_err(|e| {
        UrlError::Parse {
            url: base_url.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Segment count of a path with trailing slashes ignored; the root path
/// counts as one (empty) segment
fn path_segment_count(path: &str) -> usize {
    path.trim_end_matches('/').split('/').count()
}
