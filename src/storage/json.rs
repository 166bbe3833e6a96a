//! JSON-file implementation of the state store
//!
//! Layout inside the state directory:
//! - `seen_list_pages.json` / `seen_item_links.json` — JSON arrays of
//!   canonical URLs, rewritten on every `save()`
//! - `items.jsonl` / `list_pages.jsonl` — append-only logs, one JSON
//!   object per line, written immediately

use crate::storage::traits::{StateResult, StateStore};
use crate::storage::{ItemRecord, ListPageLogEntry, PageStatus};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const SEEN_LIST_PAGES_FILE: &str = "seen_list_pages.json";
const SEEN_ITEM_LINKS_FILE: &str = "seen_item_links.json";
const ITEMS_LOG_FILE: &str = "items.jsonl";
const LIST_PAGES_LOG_FILE: &str = "list_pages.jsonl";

/// JSON-file state store
pub struct JsonStateStore {
    seen_list_pages_file: PathBuf,
    seen_item_links_file: PathBuf,
    items_log_file: PathBuf,
    list_pages_log_file: PathBuf,

    seen_list_pages: HashSet<String>,
    seen_item_links: HashSet<String>,
}

impl JsonStateStore {
    /// Opens (or creates) a state store in `dir`
    ///
    /// Existing snapshots from a prior run are loaded, making the crawl
    /// resumable. A snapshot that cannot be read or parsed logs a warning
    /// and the corresponding set starts empty; durability is best-effort.
    pub fn open(dir: &Path) -> StateResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut store = Self {
            seen_list_pages_file: dir.join(SEEN_LIST_PAGES_FILE),
            seen_item_links_file: dir.join(SEEN_ITEM_LINKS_FILE),
            items_log_file: dir.join(ITEMS_LOG_FILE),
            list_pages_log_file: dir.join(LIST_PAGES_LOG_FILE),
            seen_list_pages: HashSet::new(),
            seen_item_links: HashSet::new(),
        };

        store.seen_list_pages = load_url_set(&store.seen_list_pages_file);
        store.seen_item_links = load_url_set(&store.seen_item_links_file);

        Ok(store)
    }

    /// Path of the items log inside this store's directory
    pub fn items_log_path(&self) -> &Path {
        &self.items_log_file
    }

    /// Path of the list-pages log inside this store's directory
    pub fn list_pages_log_path(&self) -> &Path {
        &self.list_pages_log_file
    }
}

impl StateStore for JsonStateStore {
    fn has_seen_list_page(&self, url: &str) -> bool {
        self.seen_list_pages.contains(url)
    }

    fn mark_list_page_seen(&mut self, url: &str) {
        self.seen_list_pages.insert(url.to_string());
    }

    fn has_seen_item(&self, url: &str) -> bool {
        self.seen_item_links.contains(url)
    }

    fn add_item(&mut self, url: &str, text: &str, source_page: &str) -> StateResult<()> {
        if self.seen_item_links.contains(url) {
            return Ok(());
        }

        self.seen_item_links.insert(url.to_string());

        let record = ItemRecord {
            url: url.to_string(),
            text: text.to_string(),
            source_page: source_page.to_string(),
            timestamp: now_rfc3339(),
        };

        append_jsonl(&self.items_log_file, &record)
    }

    fn append_list_page_log(
        &mut self,
        url: &str,
        status: PageStatus,
        items_found: usize,
        pagination_found: usize,
    ) -> StateResult<()> {
        let entry = ListPageLogEntry {
            url: url.to_string(),
            status,
            items_found,
            pagination_found,
            timestamp: now_rfc3339(),
        };

        append_jsonl(&self.list_pages_log_file, &entry)
    }

    fn seen_list_page_count(&self) -> usize {
        self.seen_list_pages.len()
    }

    fn seen_item_count(&self) -> usize {
        self.seen_item_links.len()
    }

    fn save(&mut self) -> StateResult<()> {
        write_url_set(&self.seen_list_pages_file, &self.seen_list_pages)?;
        write_url_set(&self.seen_item_links_file, &self.seen_item_links)?;
        Ok(())
    }

    fn clear(&mut self) -> StateResult<()> {
        self.seen_list_pages.clear();
        self.seen_item_links.clear();

        for file in [&self.seen_list_pages_file, &self.seen_item_links_file] {
            match std::fs::remove_file(file) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}

/// Loads a snapshot, starting empty on any failure
fn load_url_set(path: &Path) -> HashSet<String> {
    if !path.exists() {
        return HashSet::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            return HashSet::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(urls) => urls.into_iter().collect(),
        Err(e) => {
            tracing::warn!("Could not parse {}: {}", path.display(), e);
            HashSet::new()
        }
    }
}

/// Rewrites a snapshot file with the current set, sorted for stable diffs
fn write_url_set(path: &Path, set: &HashSet<String>) -> StateResult<()> {
    let mut urls: Vec<&String> = set.iter().collect();
    urls.sort();
    let content = serde_json::to_string_pretty(&urls)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn append_jsonl<T: Serialize>(path: &Path, entry: &T) -> StateResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(entry)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_lines(path: &Path) -> Vec<String> {
        if !path.exists() {
            return Vec::new();
        }
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::open(dir.path()).unwrap();

        assert_eq!(store.seen_list_page_count(), 0);
        assert_eq!(store.seen_item_count(), 0);
        assert!(!store.has_seen_list_page("https://x.test/list"));
    }

    #[test]
    fn test_add_item_dedup_invariant() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStateStore::open(dir.path()).unwrap();

        for _ in 0..3 {
            store
                .add_item("https://x.test/item/1", "One", "https://x.test/list")
                .unwrap();
        }

        assert_eq!(store.seen_item_count(), 1);
        let lines = read_lines(store.items_log_path());
        assert_eq!(lines.len(), 1);

        let record: ItemRecord = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(record.url, "https://x.test/item/1");
        assert_eq!(record.text, "One");
        assert_eq!(record.source_page, "https://x.test/list");
    }

    #[test]
    fn test_page_log_always_appends() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStateStore::open(dir.path()).unwrap();

        store
            .append_list_page_log("https://x.test/list", PageStatus::Error, 0, 0)
            .unwrap();
        store
            .append_list_page_log("https://x.test/list", PageStatus::Success, 4, 1)
            .unwrap();

        let lines = read_lines(store.list_pages_log_path());
        assert_eq!(lines.len(), 2);

        let first: ListPageLogEntry = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first.status, PageStatus::Error);
        let second: ListPageLogEntry = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second.status, PageStatus::Success);
        assert_eq!(second.items_found, 4);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();

        {
            let mut store = JsonStateStore::open(dir.path()).unwrap();
            store.mark_list_page_seen("https://x.test/list?page=1");
            store
                .add_item("https://x.test/item/1", "One", "https://x.test/list?page=1")
                .unwrap();
            store.save().unwrap();
        }

        let store = JsonStateStore::open(dir.path()).unwrap();
        assert!(store.has_seen_list_page("https://x.test/list?page=1"));
        assert!(store.has_seen_item("https://x.test/item/1"));
        assert_eq!(store.seen_list_page_count(), 1);
    }

    #[test]
    fn test_unsaved_marks_are_lost_but_logs_survive() {
        // Simulated crash between checkpoint and exit: the seen-set mark
        // was never saved, but the appended log line is already on disk
        let dir = TempDir::new().unwrap();

        {
            let mut store = JsonStateStore::open(dir.path()).unwrap();
            store
                .add_item("https://x.test/item/1", "One", "https://x.test/list")
                .unwrap();
            // no save()
        }

        let store = JsonStateStore::open(dir.path()).unwrap();
        assert!(!store.has_seen_item("https://x.test/item/1"));
        assert_eq!(read_lines(store.items_log_path()).len(), 1);
    }

    #[test]
    fn test_clear_removes_snapshots_keeps_logs() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStateStore::open(dir.path()).unwrap();

        store.mark_list_page_seen("https://x.test/list");
        store
            .add_item("https://x.test/item/1", "One", "https://x.test/list")
            .unwrap();
        store.save().unwrap();

        store.clear().unwrap();

        assert_eq!(store.seen_list_page_count(), 0);
        assert_eq!(store.seen_item_count(), 0);
        assert!(!dir.path().join(SEEN_LIST_PAGES_FILE).exists());
        assert!(!dir.path().join(SEEN_ITEM_LINKS_FILE).exists());
        assert!(dir.path().join(ITEMS_LOG_FILE).exists());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SEEN_LIST_PAGES_FILE), "{ not json [").unwrap();

        let store = JsonStateStore::open(dir.path()).unwrap();
        assert_eq!(store.seen_list_page_count(), 0);
    }
}
