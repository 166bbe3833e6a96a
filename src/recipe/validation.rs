use crate::recipe::types::Recipe;

/// Upper bound on `max_list_pages` before it is flagged as implausible
const PLAUSIBLE_MAX_LIST_PAGES: u32 = 1000;

/// Upper bound on `max_items` before it is flagged as implausible
const PLAUSIBLE_MAX_ITEMS: u32 = 10_000;

/// Validates a recipe and returns a list of warnings (not errors)
///
/// Warnings flag recipes that are legal but probably not what the author
/// intended: start URLs without an http(s) scheme, implausibly large
/// limits, and recipes with no pagination configured. They are surfaced to
/// the caller and never block execution.
pub fn validate(recipe: &Recipe) -> Vec<String> {
    let mut warnings = Vec::new();

    for url in &recipe.start_urls {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            warnings.push(format!("URL may be invalid (missing http/https): {}", url));
        }
    }

    if let Some(max_pages) = recipe.limits.max_list_pages {
        if max_pages > PLAUSIBLE_MAX_LIST_PAGES {
            warnings.push(format!("max_list_pages is very high: {}", max_pages));
        }
    }

    if let Some(max_items) = recipe.limits.max_items {
        if max_items > PLAUSIBLE_MAX_ITEMS {
            warnings.push(format!("max_items is very high: {}", max_items));
        }
    }

    if recipe.pagination.is_none() {
        warnings.push("No pagination configured - will only crawl start_urls".to_string());
    }

    warnings
}
