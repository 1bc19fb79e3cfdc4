//! Shared per-file cache of namespace indexes.

use super::NamespaceIndex;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hit/miss counters of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Caches one [`NamespaceIndex`] per file path.
///
/// Safe to share between threads. A file that cannot be read is indexed as
/// empty, and that empty result is cached as well.
#[derive(Debug, Default)]
pub struct ImportsCache {
    entries: RwLock<FxHashMap<PathBuf, Arc<NamespaceIndex>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ImportsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the file at `path`, reading and parsing it on first use.
    pub fn index_for(&self, path: &Path) -> Arc<NamespaceIndex> {
        if let Some(index) = self.lookup(path) {
            return index;
        }

        let index = match std::fs::read(path) {
            Ok(bytes) => NamespaceIndex::parse(&String::from_utf8_lossy(&bytes)),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "cannot read file for imports, using empty index");
                NamespaceIndex::empty()
            }
        };
        self.store(path, index)
    }

    /// Index of `path` built from already loaded `source`.
    pub fn index_for_source(&self, path: &Path, source: &str) -> Arc<NamespaceIndex> {
        if let Some(index) = self.lookup(path) {
            return index;
        }
        self.store(path, NamespaceIndex::parse(source))
    }

    /// Register a prebuilt index, replacing any cached one.
    pub fn insert(&self, path: impl Into<PathBuf>, index: Arc<NamespaceIndex>) {
        self.entries.write().insert(path.into(), index);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn lookup(&self, path: &Path) -> Option<Arc<NamespaceIndex>> {
        let index = self.entries.read().get(path).cloned();
        match &index {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        index
    }

    fn store(&self, path: &Path, index: NamespaceIndex) -> Arc<NamespaceIndex> {
        tracing::debug!(path = %path.display(), blocks = index.blocks().len(), "indexed imports");
        // Another thread may have raced us; keep whichever landed first.
        self.entries
            .write()
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(index))
            .clone()
    }
}
