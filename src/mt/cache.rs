//! Bounded translation cache shared across providers

use crate::language::Language;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

pub const DEFAULT_MAX_CACHE_SIZE: usize = 500;

/// Cache key: source code, target code and the exact source text.
///
/// Codes are language identities, not translation codes, so a hit does not depend
/// on which provider produced the cached text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub from: String,
    pub to: String,
    pub text: String,
}

impl CacheKey {
    pub fn new(from: &Language, to: &Language, text: &str) -> Self {
        Self {
            from: from.code().to_string(),
            to: to.code().to_string(),
            text: text.to_string(),
        }
    }
}

/// LRU cache of translated text
///
/// Inserts past the size limit evict the least recently used entry.
pub struct TranslationCache {
    entries: Mutex<LruCache<CacheKey, String>>,
}

impl TranslationCache {
    /// A zero `max_size` is treated as 1.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(Self::capacity(max_size))),
        }
    }

    fn capacity(max_size: usize) -> NonZeroUsize {
        NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn put(&self, key: CacheKey, value: String) {
        self.entries.lock().put(key, value);
    }

    /// Change the size limit, evicting least recently used entries if it shrinks.
    pub fn set_max_size(&self, max_size: usize) {
        self.entries.lock().resize(Self::capacity(max_size));
    }

    pub fn max_size(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CACHE_SIZE)
    }
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("TranslationCache")
            .field("len", &entries.len())
            .field("max_size", &entries.cap())
            .finish()
    }
}
