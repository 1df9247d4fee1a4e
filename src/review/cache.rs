//! # Review Cache
//!
//! Run-scoped cache of successful evaluation results, keyed by unit
//! identity ([`UnitKey`]). A distinct identity reaches the remote service
//! at most once per run; every further occurrence is served from here.
//!
//! Values are content-addressed and stable, so concurrent writers racing
//! to populate the same key are harmless — last writer wins with an
//! identical value. Failed evaluations are never stored.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::review::types::{UnitKey, Violation};

/// Statistics about cache usage during a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of lookups served from the cache
    pub hits: usize,
    /// Number of lookups that required a remote evaluation
    pub misses: usize,
}

impl CacheStats {
    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<UnitKey, Vec<Violation>>,
    stats: CacheStats,
}

/// In-memory evaluation cache shared across concurrent dispatch tasks.
///
/// The mutex is held only for map access, never across an await point.
#[derive(Debug, Default)]
pub struct ReviewCache {
    inner: Mutex<CacheInner>,
}

impl ReviewCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a prior successful result for the given identity.
    pub fn get(&self, key: &UnitKey) -> Option<Vec<Violation>> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        match inner.entries.get(key).cloned() {
            Some(violations) => {
                inner.stats.hits += 1;
                Some(violations)
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Store a successful result. Only call on success; failures must not
    /// populate the cache.
    pub fn put(&self, key: UnitKey, violations: Vec<Violation>) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.insert(key, violations);
    }

    /// Count a hit for an occurrence served without a lookup, such as a
    /// duplicate unit collapsed before dispatch. Keeps the hit/miss
    /// counters aligned with how many results were served from cached
    /// data rather than with distinct identities.
    pub fn record_hit(&self) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.stats.hits += 1;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }

    /// True when nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().expect("cache lock poisoned").stats
    }
}
