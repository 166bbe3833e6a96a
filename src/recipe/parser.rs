use crate::recipe::types::{Pagination, Recipe};
use crate::RecipeError;
use scraper::Selector;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a recipe file from the given path
///
/// Beyond TOML deserialization this enforces the fatal invariants:
/// non-empty `start_urls`, non-blank `list_scope_css`, and every CSS
/// selector in the recipe must compile. A recipe that fails any of these
/// produces no partial value.
///
/// # Arguments
///
/// * `path` - Path to the TOML recipe file
///
/// # Returns
///
/// * `Ok(Recipe)` - Successfully loaded and checked recipe
/// * `Err(RecipeError)` - Failed to load, parse, or check the recipe
pub fn load_recipe(path: &Path) -> Result<Recipe, RecipeError> {
    let content = std::fs::read_to_string(path)?;
    parse_recipe(&content)
}

/// Parses a recipe from TOML text and runs the fatal checks
pub fn parse_recipe(content: &str) -> Result<Recipe, RecipeError> {
    let recipe: Recipe = toml::from_str(content)?;
    check_recipe(&recipe)?;
    Ok(recipe)
}

/// Computes a SHA-256 hash of the recipe file content
///
/// Used to detect whether the recipe changed between crawl runs against
/// the same state directory.
pub fn compute_recipe_hash(path: &Path) -> Result<String, RecipeError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a recipe and returns both the recipe and its content hash
pub fn load_recipe_with_hash(path: &Path) -> Result<(Recipe, String), RecipeError> {
    let recipe = load_recipe(path)?;
    let hash = compute_recipe_hash(path)?;
    Ok((recipe, hash))
}

/// Fatal recipe checks that serde cannot express
fn check_recipe(recipe: &Recipe) -> Result<(), RecipeError> {
    if recipe.start_urls.is_empty() {
        return Err(RecipeError::Invalid(
            "'start_urls' must be a non-empty list".to_string(),
        ));
    }

    if recipe.list_scope_css.trim().is_empty() {
        return Err(RecipeError::Invalid(
            "'list_scope_css' must be a non-empty string".to_string(),
        ));
    }

    check_selector(&recipe.list_scope_css)?;
    check_selector(&recipe.item_link_css)?;

    match &recipe.pagination {
        Some(Pagination::Next { next_css }) => check_selector(next_css)?,
        Some(Pagination::AllLinks {
            pagination_scope_css,
        }) => check_selector(pagination_scope_css)?,
        Some(Pagination::UrlTemplate {
            page_start,
            page_end,
            ..
        }) => {
            if page_end < page_start {
                return Err(RecipeError::Invalid(format!(
                    "'pagination.page_end' ({}) must be >= 'pagination.page_start' ({})",
                    page_end, page_start
                )));
            }
        }
        None => {}
    }

    Ok(())
}

/// Verifies a CSS selector compiles, so the crawl cannot fail mid-run on it
fn check_selector(selector: &str) -> Result<(), RecipeError> {
    Selector::parse(selector).map_err(|e| RecipeError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_recipe(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_RECIPE: &str = r#"
start_urls = ["https://quotes.toscrape.com/"]
list_scope_css = "div.quote"
item_link_css = "span a[href]"

[pagination]
type = "next"
next_css = "li.next a"

[limits]
max_list_pages = 10

[output]
items_jsonl = "out/items.jsonl"
pages_jsonl = "out/list_pages.jsonl"
"#;

    #[test]
    fn test_load_valid_recipe() {
        let file = create_temp_recipe(VALID_RECIPE);
        let recipe = load_recipe(file.path()).unwrap();

        assert_eq!(recipe.start_urls.len(), 1);
        assert_eq!(recipe.list_scope_css, "div.quote");
        assert_eq!(recipe.limits.max_list_pages, Some(10));
        assert_eq!(recipe.output.items_jsonl, "out/items.jsonl");
    }

    #[test]
    fn test_load_recipe_missing_file() {
        let result = load_recipe(Path::new("/nonexistent/recipe.toml"));
        assert!(matches!(result, Err(RecipeError::Io(_))));
    }

    #[test]
    fn test_parse_recipe_invalid_toml() {
        let result = parse_recipe("this is not valid TOML {{{");
        assert!(matches!(result, Err(RecipeError::Parse(_))));
    }

    #[test]
    fn test_empty_start_urls_rejected() {
        let result = parse_recipe(
            r#"
start_urls = []
list_scope_css = "div.item"
"#,
        );
        assert!(matches!(result, Err(RecipeError::Invalid(_))));
    }

    #[test]
    fn test_missing_start_urls_rejected() {
        let result = parse_recipe(r#"list_scope_css = "div.item""#);
        assert!(matches!(result, Err(RecipeError::Parse(_))));
    }

    #[test]
    fn test_blank_list_scope_rejected() {
        let result = parse_recipe(
            r#"
start_urls = ["https://example.com/"]
list_scope_css = "   "
"#,
        );
        assert!(matches!(result, Err(RecipeError::Invalid(_))));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let result = parse_recipe(
            r#"
start_urls = ["https://example.com/"]
list_scope_css = "div.item[["
"#,
        );
        assert!(matches!(result, Err(RecipeError::InvalidSelector { .. })));
    }

    #[test]
    fn test_reversed_page_range_rejected() {
        let result = parse_recipe(
            r#"
start_urls = ["https://example.com/"]
list_scope_css = "div.item"

[pagination]
type = "url_template"
page_param = "page"
page_start = 5
page_end = 1
"#,
        );
        assert!(matches!(result, Err(RecipeError::Invalid(_))));
    }

    #[test]
    fn test_recipe_hash_is_stable() {
        let file = create_temp_recipe(VALID_RECIPE);

        let hash1 = compute_recipe_hash(file.path()).unwrap();
        let hash2 = compute_recipe_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_recipes_different_hash() {
        let file1 = create_temp_recipe(VALID_RECIPE);
        let file2 = create_temp_recipe(&VALID_RECIPE.replace("div.quote", "div.card"));

        let hash1 = compute_recipe_hash(file1.path()).unwrap();
        let hash2 = compute_recipe_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
