//! Page persistence contract.
//!
//! [`PageStore`] is the seam between the engines and durable storage. Every
//! write archives the page's previous state and bumps its version;
//! [`PageStore::save_batch`] is the unit of work the bulk editor commits
//! through and must apply every page or none.
//!
//! [`MemoryStore`] is the in-process implementation used by the CLI and
//! tests. The server crate provides a PostgreSQL implementation.

use crate::content::{ContentTree, DocumentType, PageStatus};
use crate::{PagewrightError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::future::{Future, ready};
use std::sync::{Mutex, MutexGuard};

/// A page as held by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPage {
    #[serde(flatten)]
    pub tree: ContentTree,
    pub status: PageStatus,
    pub version: u32,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedVersion {
    pub slug: String,
    pub version: u32,
}

/// Listing filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageFilter {
    pub document_type: Option<DocumentType>,
    pub status: Option<PageStatus>,
    /// Case-insensitive substring of the slug or SEO title
    pub search: Option<String>,
}

impl PageFilter {
    pub fn matches(&self, page: &StoredPage) -> bool {
        if self.document_type.is_some_and(|t| t != page.tree.document_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != page.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(search) => {
                let needle = search.to_lowercase();
                page.tree.slug.to_lowercase().contains(&needle)
                    || page.tree.seo_meta.title.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Durable page storage.
///
/// Futures are `Send` so stores can be shared across a multi-threaded
/// runtime.
pub trait PageStore: Send + Sync {
    /// Current state of a page, if stored.
    fn load(&self, slug: &str) -> impl Future<Output = Result<Option<StoredPage>>> + Send;

    /// Creates a page at version 1 or supersedes the current one.
    fn save(&self, tree: &ContentTree, status: PageStatus) -> impl Future<Output = Result<SavedVersion>> + Send;

    /// Pages matching `filter`, most recently written first.
    fn list(&self, filter: &PageFilter) -> impl Future<Output = Result<Vec<StoredPage>>> + Send;

    /// Saves every page in one unit of work. On error nothing is written.
    fn save_batch(
        &self, pages: &[(ContentTree, PageStatus)],
    ) -> impl Future<Output = Result<Vec<SavedVersion>>> + Send;
}

#[derive(Debug, Default)]
struct Entry {
    current: Option<StoredPage>,
    history: Vec<StoredPage>,
    /// Monotonic write counter used for recency ordering
    written_at: u64,
}

#[derive(Debug, Default)]
struct Inner {
    pages: BTreeMap<String, Entry>,
    clock: u64,
    unwritable: HashSet<String>,
}

impl Inner {
    fn check_writable(&self, slug: &str) -> Result<()> {
        if self.unwritable.contains(slug) {
            return Err(PagewrightError::Storage(format!("write rejected for page '{}'", slug)));
        }
        Ok(())
    }

    fn write(&mut self, tree: &ContentTree, status: PageStatus) -> SavedVersion {
        self.clock += 1;
        let clock = self.clock;
        let entry = self.pages.entry(tree.slug.clone()).or_default();

        let version = match entry.current.take() {
            Some(previous) => {
                let next = previous.version + 1;
                entry.history.push(previous);
                next
            }
            None => 1,
        };

        entry.current = Some(StoredPage { tree: tree.clone(), status, version });
        entry.written_at = clock;

        SavedVersion { slug: tree.slug.clone(), version }
    }
}

/// Mutex-guarded in-memory store with version history.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a slug as unwritable: any save touching it fails with a
    /// storage error. Lets callers exercise rollback paths.
    pub fn reject_writes_for(&self, slug: impl Into<String>) -> Result<()> {
        self.lock()?.unwritable.insert(slug.into());
        Ok(())
    }

    /// Archived versions of a page, oldest first.
    pub fn history(&self, slug: &str) -> Result<Vec<StoredPage>> {
        Ok(self
            .lock()?
            .pages
            .get(slug)
            .map(|entry| entry.history.clone())
            .unwrap_or_default())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PagewrightError::Storage("memory store lock poisoned".to_string()))
    }

    fn save_now(&self, tree: &ContentTree, status: PageStatus) -> Result<SavedVersion> {
        let mut inner = self.lock()?;
        inner.check_writable(&tree.slug)?;
        Ok(inner.write(tree, status))
    }

    fn save_batch_now(&self, pages: &[(ContentTree, PageStatus)]) -> Result<Vec<SavedVersion>> {
        let mut inner = self.lock()?;
        for (tree, _) in pages {
            inner.check_writable(&tree.slug)?;
        }
        Ok(pages.iter().map(|(tree, status)| inner.write(tree, *status)).collect())
    }

    fn list_now(&self, filter: &PageFilter) -> Result<Vec<StoredPage>> {
        let inner = self.lock()?;
        let mut entries: Vec<&Entry> = inner
            .pages
            .values()
            .filter(|entry| entry.current.as_ref().is_some_and(|page| filter.matches(page)))
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.written_at));
        Ok(entries.into_iter().filter_map(|entry| entry.current.clone()).collect())
    }
}

impl PageStore for MemoryStore {
    fn load(&self, slug: &str) -> impl Future<Output = Result<Option<StoredPage>>> + Send {
        ready(self.lock().map(|inner| inner.pages.get(slug).and_then(|entry| entry.current.clone())))
    }

    fn save(&self, tree: &ContentTree, status: PageStatus) -> impl Future<Output = Result<SavedVersion>> + Send {
        ready(self.save_now(tree, status))
    }

    fn list(&self, filter: &PageFilter) -> impl Future<Output = Result<Vec<StoredPage>>> + Send {
        ready(self.list_now(filter))
    }

    fn save_batch(
        &self, pages: &[(ContentTree, PageStatus)],
    ) -> impl Future<Output = Result<Vec<SavedVersion>>> + Send {
        ready(self.save_batch_now(pages))
    }
}
