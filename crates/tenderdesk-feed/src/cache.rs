//! TTL-keyed result cache.
//!
//! Entries are addressed by [`Fingerprint`] and considered absent once
//! their age exceeds the configured time-to-live. There is no
//! size-based eviction: growth is bounded in practice by the TTL and by
//! the full `clear()` performed on refetch and identity change.
//!
//! Uses `DashMap` for lock-free concurrent access and `tokio::time`
//! instants so the expiry clock can be driven in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::fingerprint::Fingerprint;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Fingerprint-keyed cache with a fixed time-to-live.
pub struct TtlCache<V> {
    entries: DashMap<Fingerprint, CacheEntry<V>>,
    ttl: Duration,
    stats: Arc<CacheStatistics>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            stats: Arc::new(CacheStatistics::default()),
        }
    }

    /// Returns the cached value, or `None` if the key is unseen or the
    /// entry has outlived the TTL. Expired entries are dropped on the
    /// way out.
    pub fn get(&self, key: &Fingerprint) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_stale(self.ttl) {
                drop(entry); // release the read guard before removing
                self.entries.remove(key);
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                self.stats.size.store(self.entries.len(), Ordering::Relaxed);
                return None;
            }
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Some(entry.value.clone());
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores a value with the current timestamp, overwriting any prior
    /// entry for the key.
    pub fn put(&self, key: Fingerprint, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
        self.stats.insertions.fetch_add(1, Ordering::Relaxed);
        self.stats.size.store(self.entries.len(), Ordering::Relaxed);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.size.store(0, Ordering::Relaxed);
    }

    /// The configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries currently stored (stale ones included until
    /// they are touched).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Default)]
struct CacheStatistics {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    insertions: AtomicU64,
    size: AtomicUsize,
}

impl CacheStatistics {
    fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStatsSnapshot {
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            size: self.size.load(Ordering::Relaxed),
            hit_ratio: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}

/// A point-in-time snapshot of cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub insertions: u64,
    pub size: usize,
    pub hit_ratio: f64,
}
