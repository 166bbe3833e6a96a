//! Crawl coordinator - main crawl orchestration logic
//!
//! Drives the FIFO queue of list pages: dequeue, skip-if-seen, fetch,
//! extract item links and pagination links, deduplicate through the state
//! store, enqueue unseen pagination URLs, and checkpoint the seen-sets.
//! The walk is breadth-first across the pagination graph starting from the
//! recipe's start URLs.

use crate::crawler::fetcher::Fetcher;
use crate::extract::{count_selector_matches, extract_item_links, extract_pagination_links};
use crate::output::CrawlStats;
use crate::recipe::{validate, Recipe};
use crate::storage::{JsonStateStore, PageStatus, StateStore};
use crate::url::canonicalize;
use crate::{HarvestError, Result};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// How often (in processed pages) the seen-sets are checkpointed
const CHECKPOINT_INTERVAL: u64 = 5;

/// Run-mode flags for a crawl
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print discovered links instead of persisting anything
    pub dry_run: bool,

    /// Reprocess list pages even if already seen
    pub force: bool,

    /// Clear all prior state before running (implies `force`)
    pub fresh: bool,

    /// Log match counts for the recipe's CSS selectors
    pub verbose_selectors: bool,
}

impl RunOptions {
    fn reprocess_seen(&self) -> bool {
        self.force || self.fresh
    }
}

/// Outcome of a single page-processing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    /// Already in the seen-set and force mode is off
    Skipped,
    /// Fetched, extracted, logged with status=success
    Processed,
    /// Fetch failed; logged with status=error, not marked seen
    Failed,
}

/// Recipe-driven list crawler
///
/// Owns the queue and drives all state-store writes. Exactly one page is
/// in flight at a time; running two crawlers against the same state
/// directory is unsupported.
pub struct ListCrawler<F: Fetcher> {
    recipe: Recipe,
    fetcher: F,
    state: JsonStateStore,
    queue: VecDeque<String>,
    /// Canonical URLs ever enqueued this run; prevents double-enqueueing
    queued_urls: HashSet<String>,
    options: RunOptions,
    stats: CrawlStats,
}

impl<F: Fetcher> ListCrawler<F> {
    /// Creates a crawler with the state directory derived from the
    /// recipe's output location (parent of `output.items_jsonl`)
    pub fn new(recipe: Recipe, fetcher: F, options: RunOptions) -> Result<Self> {
        let state_dir = state_dir_for(&recipe);
        Self::with_state_dir(recipe, fetcher, options, &state_dir)
    }

    /// Creates a crawler with an explicit state directory
    pub fn with_state_dir(
        recipe: Recipe,
        fetcher: F,
        options: RunOptions,
        state_dir: &Path,
    ) -> Result<Self> {
        let mut state = JsonStateStore::open(state_dir)?;

        if options.fresh {
            tracing::info!("Fresh run requested - clearing existing state");
            state.clear()?;
        }

        let mut queue = VecDeque::new();
        let mut queued_urls = HashSet::new();

        for url in &recipe.start_urls {
            let canonical = canonicalize(url)?;
            if queued_urls.insert(canonical.clone()) {
                queue.push_back(canonical);
            }
        }

        Ok(Self {
            recipe,
            fetcher,
            state,
            queue,
            queued_urls,
            options,
            stats: CrawlStats::default(),
        })
    }

    /// Runs the main crawl loop
    ///
    /// Dequeues one canonical URL at a time until the queue is empty or a
    /// limit halts the run. Fetch failures are logged and the loop
    /// continues; only extraction-level errors (which recipe loading
    /// normally rules out) abort the run.
    pub async fn run(&mut self) -> Result<CrawlStats> {
        tracing::info!("Starting list crawl");
        tracing::info!("Recipe: {} start URLs", self.recipe.start_urls.len());
        tracing::info!("List scope: {}", self.recipe.list_scope_css);
        tracing::info!("Item link selector: {}", self.recipe.item_link_css);

        if let Some(max_pages) = self.recipe.limits.max_list_pages {
            tracing::info!("Max list pages: {}", max_pages);
        }
        if let Some(max_items) = self.recipe.limits.max_items {
            tracing::info!("Max items: {}", max_items);
        }

        if self.options.dry_run {
            tracing::info!("DRY RUN MODE - No changes will be saved");
        }

        while let Some(url) = self.queue.pop_front() {
            let outcome = self.process_list_page(&url).await?;

            if !self.options.dry_run {
                match outcome {
                    PageOutcome::Processed
                        if self.stats.pages_visited % CHECKPOINT_INTERVAL == 0 =>
                    {
                        self.checkpoint();
                    }
                    PageOutcome::Failed => self.checkpoint(),
                    _ => {}
                }
            }

            if self.should_stop() {
                break;
            }
        }

        if !self.options.dry_run {
            self.checkpoint();
        }

        self.stats.log_summary();

        Ok(self.stats.clone())
    }

    /// Statistics accumulated so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Processes a single list page through the
    /// queued -> fetching -> {skipped | processed | failed} transitions
    async fn process_list_page(&mut self, url: &str) -> Result<PageOutcome> {
        tracing::info!("Processing list page: {}", url);

        if !self.options.reprocess_seen() && self.state.has_seen_list_page(url) {
            tracing::info!("  Skipping (already seen)");
            self.stats.pages_skipped += 1;
            return Ok(PageOutcome::Skipped);
        }

        let Some(html) = self.fetcher.fetch(url).await else {
            tracing::error!("  Failed to fetch page");
            self.stats.pages_failed += 1;
            if !self.options.dry_run {
                self.try_append_log(url, PageStatus::Error, 0, 0);
            }
            return Ok(PageOutcome::Failed);
        };

        if self.options.verbose_selectors {
            let scope_count = count_selector_matches(&html, &self.recipe.list_scope_css);
            tracing::info!(
                "  Selector '{}' matched {} elements",
                self.recipe.list_scope_css,
                scope_count
            );
        }

        let item_links = extract_item_links(
            &html,
            url,
            &self.recipe.list_scope_css,
            &self.recipe.item_link_css,
        )?;

        tracing::info!("  Found {} item links", item_links.len());

        let mut new_items = 0;
        for item in &item_links {
            // Stop admitting items the moment the limit is hit; the rest
            // of the page stays extractable by a later forced run
            if self.at_items_limit() {
                break;
            }

            let canonical = match canonicalize(&item.url) {
                Ok(c) => c,
                Err(e) => {
                    tracing::debug!("Skipping item with bad URL {}: {}", item.url, e);
                    continue;
                }
            };

            if !self.state.has_seen_item(&canonical) {
                if !self.options.dry_run {
                    if let Err(e) = self.state.add_item(&canonical, &item.text, url) {
                        tracing::warn!("Failed to record item {}: {}", canonical, e);
                    }
                }
                new_items += 1;
                self.stats.items_discovered += 1;
            }

            if self.options.dry_run {
                println!("    Item: {} ({})", canonical, item.text);
            }
        }

        tracing::info!("  Added {} new items", new_items);

        let mut pagination_found = 0;
        if let Some(pagination) = self.recipe.pagination.clone() {
            let links = extract_pagination_links(&html, url, &pagination)?;
            pagination_found = links.len();

            tracing::info!("  Found {} pagination links", pagination_found);
            self.stats.pagination_links_found += pagination_found as u64;

            if self.options.dry_run {
                if !links.is_empty() {
                    println!("    Pagination links:");
                    for link in &links {
                        println!("      {}", link);
                    }
                }
            } else {
                self.enqueue_pagination_links(&links);
            }
        }

        if !self.options.dry_run {
            self.state.mark_list_page_seen(url);
            self.try_append_log(url, PageStatus::Success, item_links.len(), pagination_found);
        }

        self.stats.pages_visited += 1;

        Ok(PageOutcome::Processed)
    }

    /// Canonicalizes and enqueues pagination links not already queued or
    /// seen
    fn enqueue_pagination_links(&mut self, links: &[String]) {
        let mut new_links = 0;

        for link in links {
            let canonical = match canonicalize(link) {
                Ok(c) => c,
                Err(e) => {
                    tracing::debug!("Skipping pagination link with bad URL {}: {}", link, e);
                    continue;
                }
            };

            if self.queued_urls.contains(&canonical) {
                continue;
            }

            // Seen pages stay out of the queue unless the run forces
            // reprocessing; the queued-set above still breaks same-run loops
            if !self.options.reprocess_seen() && self.state.has_seen_list_page(&canonical) {
                continue;
            }

            self.queue.push_back(canonical.clone());
            self.queued_urls.insert(canonical);
            new_links += 1;
        }

        if new_links > 0 {
            tracing::info!("  Enqueued {} new pagination links", new_links);
        }
    }

    /// Appends a page log entry, downgrading persistence failures to a
    /// warning (durability is best-effort, the run continues)
    fn try_append_log(
        &mut self,
        url: &str,
        status: PageStatus,
        items_found: usize,
        pagination_found: usize,
    ) {
        if let Err(e) = self
            .state
            .append_list_page_log(url, status, items_found, pagination_found)
        {
            tracing::warn!("Failed to append page log for {}: {}", url, e);
        }
    }

    /// Persists the seen-sets; failures are warnings, not fatal
    fn checkpoint(&mut self) {
        if let Err(e) = self.state.save() {
            tracing::warn!("Failed to persist state: {} - continuing in memory", e);
        }
    }

    fn at_items_limit(&self) -> bool {
        self.recipe
            .limits
            .max_items
            .is_some_and(|max| self.stats.items_discovered >= max as u64)
    }

    /// Evaluates stop conditions after each page
    fn should_stop(&self) -> bool {
        if let Some(max_pages) = self.recipe.limits.max_list_pages {
            if self.stats.pages_visited >= max_pages as u64 {
                tracing::info!("Reached max_list_pages limit: {}", max_pages);
                return true;
            }
        }

        if let Some(max_items) = self.recipe.limits.max_items {
            if self.stats.items_discovered >= max_items as u64 {
                tracing::info!("Reached max_items limit: {}", max_items);
                return true;
            }
        }

        false
    }
}

/// State directory for a recipe: the parent of its items output path
fn state_dir_for(recipe: &Recipe) -> PathBuf {
    match Path::new(&recipe.output.items_jsonl).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Runs a list crawl from a recipe file
///
/// Loads the recipe, logs validation warnings, and drives the crawl with
/// the HTTP fetcher.
pub async fn run_list_crawl(recipe_path: &Path, options: RunOptions) -> Result<CrawlStats> {
    tracing::info!("Loading recipe: {}", recipe_path.display());
    let (recipe, hash) = crate::recipe::load_recipe_with_hash(recipe_path)?;
    tracing::info!("Recipe loaded (hash: {})", hash);

    let warnings = validate(&recipe);
    if !warnings.is_empty() {
        tracing::warn!("Recipe validation warnings:");
        for warning in &warnings {
            tracing::warn!("  - {}", warning);
        }
    }

    let fetcher = crate::crawler::HttpFetcher::new().map_err(HarvestError::Reqwest)?;
    let mut crawler = ListCrawler::new(recipe, fetcher, options)?;
    crawler.run().await
}
