//! TTL- and size-bounded review cache.
//!
//! [`ReviewCache`] maps a request fingerprint to previously generated text.
//! The fingerprint covers the semantically relevant subset of a request
//! (subject, rating, trip type, sorted highlights) and deliberately excludes
//! voice, language, and guest count so near-duplicate requests share a slot.
//!
//! # Semantics
//!
//! - A read hit requires the entry to be unexpired. Expired-but-present
//!   entries count as misses but are not removed by the read itself; a
//!   periodic sweep (driven by the orchestrator) purges them.
//! - At capacity, the oldest-inserted entry is evicted first. Insertion
//!   order, not recency: re-reading an entry does not protect it.
//! - A disabled cache turns both paths into no-ops. No operation on this
//!   component can fail.
//!
//! Timekeeping uses `tokio::time::Instant` so paused-clock tests can drive
//! expiry deterministically.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::GenerationRequest;
use crate::config::CacheConfig;
use crate::telemetry;

/// Compute the cache fingerprint for a request.
///
/// Highlights are sorted before hashing so requests differing only in
/// highlight order share a slot. Uses `DefaultHasher` (SipHash), which is
/// deterministic within a process lifetime — sufficient for an in-memory
/// cache.
pub fn fingerprint(request: &GenerationRequest) -> u64 {
    let mut hasher = DefaultHasher::new();
    request.subject_name.hash(&mut hasher);
    request.rating.hash(&mut hasher);
    request.trip_type.hash(&mut hasher);
    let mut highlights: Vec<&str> = request.highlights.iter().map(String::as_str).collect();
    highlights.sort_unstable();
    for highlight in highlights {
        highlight.hash(&mut hasher);
    }
    hasher.finish()
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently stored (expired-but-unswept entries included).
    pub entries: usize,
    /// Reads that returned a live entry.
    pub hits: u64,
    /// Reads that found nothing usable.
    pub misses: u64,
    /// Entries removed to honour the size bound.
    pub evictions: u64,
    /// Expired entries removed by sweeps.
    pub swept: u64,
    /// Whether the cache is currently enabled.
    pub enabled: bool,
    /// Configured size bound.
    pub max_entries: usize,
}

struct CacheEntry {
    text: String,
    expires_at: Instant,
}

struct CacheInner {
    enabled: bool,
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<u64, CacheEntry>,
    // Fingerprints in insertion order; front = oldest = next eviction.
    order: VecDeque<u64>,
    hits: u64,
    misses: u64,
    evictions: u64,
    swept: u64,
}

/// In-memory TTL cache with insertion-order eviction.
pub struct ReviewCache {
    inner: Mutex<CacheInner>,
}

impl ReviewCache {
    /// Create a cache from its configuration section.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                enabled: config.enabled,
                ttl: config.ttl(),
                max_entries: config.max_entries,
                entries: HashMap::new(),
                order: VecDeque::new(),
                hits: 0,
                misses: 0,
                evictions: 0,
                swept: 0,
            }),
        }
    }

    /// Look up cached text for a request.
    ///
    /// Returns `None` on miss, including when the stored entry has
    /// expired; expired entries are left for the sweep.
    pub fn get(&self, request: &GenerationRequest) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if !inner.enabled {
            return None;
        }
        let key = fingerprint(request);
        match inner.entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                let text = entry.text.clone();
                inner.hits += 1;
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(text)
            }
            _ => {
                inner.misses += 1;
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store generated text for a request.
    ///
    /// At capacity, the oldest-inserted entry is evicted first.
    /// Re-inserting an existing fingerprint overwrites text and expiry
    /// without changing its position in the eviction order.
    pub fn insert(&self, request: &GenerationRequest, text: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if !inner.enabled {
            return;
        }
        let key = fingerprint(request);
        let expires_at = Instant::now() + inner.ttl;
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.text = text.into();
            entry.expires_at = expires_at;
            return;
        }
        if inner.entries.len() >= inner.max_entries {
            Self::evict_oldest(inner);
        }
        inner.entries.insert(
            key,
            CacheEntry {
                text: text.into(),
                expires_at,
            },
        );
        inner.order.push_back(key);
    }

    /// Purge all expired entries, returning how many were removed.
    ///
    /// Called on a fixed interval by the orchestrator's sweep task,
    /// independent of read activity.
    pub fn sweep(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        let now = Instant::now();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - inner.entries.len();
        if removed > 0 {
            let entries = &inner.entries;
            inner.order.retain(|key| entries.contains_key(key));
            inner.swept += removed as u64;
        }
        removed
    }

    /// Remove all entries. Counters are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Apply a new configuration section in place.
    ///
    /// Shrinking `max_entries` evicts from the insertion-order front until
    /// the store fits. The new TTL applies to subsequent inserts only.
    pub fn reconfigure(&self, config: &CacheConfig) {
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        inner.enabled = config.enabled;
        inner.ttl = config.ttl();
        inner.max_entries = config.max_entries;
        while inner.entries.len() > inner.max_entries {
            Self::evict_oldest(inner);
        }
    }

    /// Current statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap();
        CacheStats {
            entries: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            swept: inner.swept,
            enabled: inner.enabled,
            max_entries: inner.max_entries,
        }
    }

    fn evict_oldest(inner: &mut CacheInner) {
        while let Some(oldest) = inner.order.pop_front() {
            if inner.entries.remove(&oldest).is_some() {
                inner.evictions += 1;
                metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(1);
                break;
            }
        }
    }
}
