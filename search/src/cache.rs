//! The candidate cache: memoized decode outcomes shared across branches.
//!
//! A decode outcome is a pure function of `(input text, decoder,
//! parameters)`, so entries never invalidate within a request and
//! concurrent puts of the same key are idempotent by construction. The
//! cache is scoped to one top-level request by default; batch callers can
//! reuse one instance across requests with a capacity bound, at which
//! point least-recently-used entries are evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use peel_codecs::DecodeOutcome;

use crate::fingerprint::{fingerprint, ContentHash, DOMAIN_CACHE_KEY};

/// Cache key: normalized input fingerprint + decoder identity + parameter
/// digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    text_fingerprint: String,
    decoder: String,
    params: String,
}

impl CacheKey {
    /// Build a key. The input text is fingerprinted (not stored) so keys
    /// stay small regardless of candidate size.
    #[must_use]
    pub fn new(text: &str, decoder: &str, params_digest: &str) -> Self {
        let fp: ContentHash = fingerprint(DOMAIN_CACHE_KEY, text.as_bytes());
        Self {
            text_fingerprint: fp.hex_digest().to_string(),
            decoder: decoder.to_string(),
            params: params_digest.to_string(),
        }
    }
}

struct CacheSlot {
    outcome: DecodeOutcome,
    last_used: u64,
}

struct CacheState {
    map: HashMap<CacheKey, CacheSlot>,
    tick: u64,
}

/// Hit/miss counters, snapshot into the search report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Concurrent decode-outcome cache.
pub struct DecodeCache {
    inner: RwLock<CacheState>,
    capacity: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DecodeCache {
    /// Unbounded cache for a single request — the visited decode space is
    /// finite, so no eviction is needed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CacheState {
                map: HashMap::new(),
                tick: 0,
            }),
            capacity: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Capacity-bounded cache for batch use; least-recently-used entries
    /// are evicted once `capacity` is exceeded.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new()
        }
    }

    /// Look up a decode outcome.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<DecodeOutcome> {
        let found = {
            let state = self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner);
            state.map.get(key).map(|slot| slot.outcome.clone())
        };
        match found {
            Some(outcome) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                if self.capacity.is_some() {
                    let mut state = self
                        .inner
                        .write()
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                    state.tick += 1;
                    let tick = state.tick;
                    if let Some(slot) = state.map.get_mut(key) {
                        slot.last_used = tick;
                    }
                }
                Some(outcome)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a decode outcome. First put wins: outcomes are pure functions
    /// of the key, so a concurrent duplicate carries identical data and is
    /// dropped without comparison.
    pub fn put(&self, key: CacheKey, outcome: DecodeOutcome) {
        let mut state = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.tick += 1;
        let tick = state.tick;
        state.map.entry(key).or_insert(CacheSlot {
            outcome,
            last_used: tick,
        });
        if let Some(capacity) = self.capacity {
            while state.map.len() > capacity {
                let Some(oldest) = state
                    .map
                    .iter()
                    .min_by_key(|(_, slot)| slot.last_used)
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                state.map.remove(&oldest);
            }
        }
    }

    /// Current entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .map
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot the hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for DecodeCache {
    fn default() -> Self {
        Self::new()
    }
}
