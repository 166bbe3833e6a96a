use crate::UrlError;
use url::Url;

/// Tracking query parameters removed during canonicalization.
///
/// Any `utm_*` parameter is also removed, regardless of suffix.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "msclkid", "mc_cid", "mc_eid", "_ga", "_gl", "ref", "source",
];

/// Canonicalizes a URL with tracking-parameter stripping enabled
///
/// The canonical form is the identity used for every dedup decision in the
/// crawler: two URLs are the same crawl target iff they canonicalize to the
/// same string.
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Remove the fragment
/// 3. Remove trailing slashes from the path (the root `/` is kept)
/// 4. Remove tracking query parameters (`utm_*` plus a fixed set)
/// 5. Re-encode the remaining query, preserving key order and multiplicity
/// 6. Drop the query entirely if nothing remains
///
/// # Examples
///
/// ```
/// use listharvest::url::canonicalize;
///
/// let url = canonicalize("https://example.com/page/?utm_source=a&id=1#top").unwrap();
/// assert_eq!(url, "https://example.com/page?id=1");
/// ```
pub fn canonicalize(url_str: &str) -> Result<String, UrlError> {
    canonicalize_with(url_str, true)
}

/// Canonicalizes a URL, optionally keeping tracking parameters
pub fn canonicalize_with(url_str: &str, strip_tracking: bool) -> Result<String, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse {
        url: url_str.to_string(),
        message: e.to_string(),
    })?;

    url.set_fragment(None);

    // Trailing slashes: removing all of them keeps canonicalization
    // idempotent ("/p//" would otherwise need two passes)
    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        url.set_path(&trimmed);
    }

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !strip_tracking || !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            drop(pairs);
        }
    }

    Ok(url.to_string())
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// Resolves an href against a base URL
///
/// Handles protocol-relative (`//host/p`), root-relative (`/p`), and
/// relative (`p`, `../p`) hrefs with standard URL join semantics.
pub fn resolve(base: &str, href: &str) -> Result<String, UrlError> {
    let base_url = Url::parse(base).map_err(|e| UrlError::Parse {
        url: base.to_string(),
        message: e.to_string(),
    })?;

    base_url
        .join(href)
        .map(|joined| joined.to_string())
        .map_err(|e| UrlError::Resolve {
            base: base.to_string(),
            href: href.to_string(),
            message: e.to_string(),
        })
}
