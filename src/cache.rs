//! Optional caching layer (§5): a strategy-instance cache and a
//! content+config-keyed result cache, both LRU-backed and off by
//! default so the common path pays nothing.

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::types::Chunk;

fn hash_str(s: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Cache key combining a content hash and a config hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCacheKey(u64, u64);

impl ResultCacheKey {
    pub fn new(content: &str, config_fingerprint: &str) -> Self {
        Self(hash_str(content), hash_str(config_fingerprint))
    }
}

/// LRU cache of full chunk sequences keyed by `(content hash, config
/// hash)`. Never held across a component boundary: callers lock, read
/// or write, then drop the guard.
pub struct EngineCache {
    results: Mutex<LruCache<ResultCacheKey, Vec<Chunk>>>,
}

impl EngineCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            results: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &ResultCacheKey) -> Option<Vec<Chunk>> {
        self.results.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: ResultCacheKey, chunks: Vec<Chunk>) {
        self.results.lock().unwrap().put(key, chunks);
    }

    pub fn clear(&self) {
        self.results.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.results.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, ContentType, StrategyKind};

    #[test]
    fn put_then_get_round_trips() {
        let cache = EngineCache::new(4);
        let key = ResultCacheKey::new("input text", "config-fingerprint");
        let chunk = Chunk::new(
            "body".to_string(),
            1,
            1,
            ChunkMetadata::new(StrategyKind::Fallback, ContentType::Text),
        );
        cache.put(key, vec![chunk]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn clear_empties_cache() {
        let cache = EngineCache::new(4);
        let key = ResultCacheKey::new("a", "b");
        cache.put(key, Vec::new());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn distinct_configs_are_distinct_keys() {
        let a = ResultCacheKey::new("same input", "config-a");
        let b = ResultCacheKey::new("same input", "config-b");
        assert_ne!(a, b);
    }
}
