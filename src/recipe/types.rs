use serde::Deserialize;

/// A complete crawl recipe: what to crawl and how to extract links from it.
///
/// Loaded from a TOML file and immutable for the lifetime of a crawl run.
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    /// Ordered list of URLs that seed the crawl queue
    pub start_urls: Vec<String>,

    /// CSS selector identifying each repeating item container on a list page
    pub list_scope_css: String,

    /// CSS selector for item links within each container
    #[serde(default = "default_item_link_css")]
    pub item_link_css: String,

    /// Pagination strategy; absent means only start URLs are processed
    #[serde(default)]
    pub pagination: Option<Pagination>,

    #[serde(default)]
    pub limits: Limits,

    #[serde(default)]
    pub output: OutputPaths,
}

/// Pagination strategy, dispatched exhaustively at extraction time.
///
/// The `type` field in the recipe file selects the variant; each variant
/// carries exactly the fields it needs, so a recipe missing a required
/// field fails at load rather than mid-crawl.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pagination {
    /// Follow a single "next page" link
    Next { next_css: String },

    /// Collect every link inside a pagination container
    AllLinks { pagination_scope_css: String },

    /// Generate page URLs by rewriting a query parameter, ignoring the HTML
    UrlTemplate {
        page_param: String,
        page_start: u32,
        page_end: u32,
    },
}

/// Crawl limits; either limit halts the run as soon as it is reached
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub max_list_pages: Option<u32>,

    #[serde(default)]
    pub max_items: Option<u32>,
}

/// Output file locations. The state store lives in their parent directory.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputPaths {
    #[serde(default = "default_items_jsonl")]
    pub items_jsonl: String,

    #[serde(default = "default_pages_jsonl")]
    pub pages_jsonl: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            items_jsonl: default_items_jsonl(),
            pages_jsonl: default_pages_jsonl(),
        }
    }
}

fn default_item_link_css() -> String {
    "a[href]".to_string()
}

fn default_items_jsonl() -> String {
    "output/items.jsonl".to_string()
}

fn default_pages_jsonl() -> String {
    "output/list_pages.jsonl".to_string()
}
