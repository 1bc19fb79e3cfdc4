//! Shared cache of extracted generics, keyed by declaration.

use super::resolver::GenericsResolver;
use parking_lot::RwLock;
use phpdoc_source::CacheStats;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe map from declaration key (`App\Foo`, `App\Foo->bar()`, ...)
/// to the complete generics of that declaration's docblock.
///
/// Lookups return forks, so a hit never shares its concreteness flag with
/// the cached entry or with other hits.
#[derive(Debug, Default)]
pub struct GenericsCache {
    entries: RwLock<FxHashMap<String, GenericsResolver>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl GenericsCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fork of the cached resolver, so callers cannot disturb the entry.
    pub fn get(&self, key: &str) -> Option<GenericsResolver> {
        let found = self.entries.read().get(key).map(GenericsResolver::fork);
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store `generics` under `key`, replacing any earlier entry.
    pub fn insert(&self, key: impl Into<String>, generics: GenericsResolver) {
        self.entries.write().insert(key.into(), generics);
    }

    /// Hit and miss counts since creation.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of cached declarations.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry; the counters are kept.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpdoc_syntax::TypeNode;

    #[test]
    fn test_hits_are_forks() {
        let cache = GenericsCache::new();
        let mut generics = GenericsResolver::new();
        generics.set_template_type("T", TypeNode::template("T", None));
        cache.insert("App\\Box", generics);

        let first = cache.get("App\\Box").unwrap();
        first.map("T");
        assert!(!first.is_concrete());

        let second = cache.get("App\\Box").unwrap();
        assert!(second.is_concrete());
        assert!(cache.get("App\\Other").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }
}
