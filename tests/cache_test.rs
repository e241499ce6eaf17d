//! Integration tests for cache TTL, size bound, and sweep behaviour.
//!
//! These run under tokio's paused clock (`start_paused`) so expiry can be
//! driven deterministically with `tokio::time::advance`.

use std::time::Duration;

use skald::cache::ReviewCache;
use skald::{CacheConfig, GenerationRequest, TripType};

fn request(subject: &str) -> GenerationRequest {
    GenerationRequest::new(subject, 4, TripType::Leisure).unwrap()
}

fn cache_with(ttl_secs: u64, max_entries: usize) -> ReviewCache {
    ReviewCache::new(&CacheConfig {
        ttl_secs,
        max_entries,
        ..CacheConfig::default()
    })
}

// ============================================================================
// TTL correctness
// ============================================================================

/// An entry written at time t is retrievable for reads at time < t+ttl
/// and absent for reads at time >= t+ttl.
#[tokio::test(start_paused = true)]
async fn entry_expires_exactly_at_ttl() {
    let cache = cache_with(10, 100);
    let req = request("Inn");
    cache.insert(&req, "text");

    assert_eq!(cache.get(&req).as_deref(), Some("text"));

    tokio::time::advance(Duration::from_secs(9)).await;
    assert_eq!(cache.get(&req).as_deref(), Some("text"));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(cache.get(&req), None, "read at t+ttl must miss");
}

/// An expired read counts as a miss but leaves the entry for the sweep.
#[tokio::test(start_paused = true)]
async fn expired_read_does_not_remove_the_entry() {
    let cache = cache_with(5, 100);
    let req = request("Inn");
    cache.insert(&req, "text");

    tokio::time::advance(Duration::from_secs(6)).await;
    assert_eq!(cache.get(&req), None);

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test(start_paused = true)]
async fn sweep_purges_all_expired_entries() {
    let cache = cache_with(5, 100);
    cache.insert(&request("A"), "a");
    cache.insert(&request("B"), "b");

    tokio::time::advance(Duration::from_secs(3)).await;
    cache.insert(&request("C"), "c");

    tokio::time::advance(Duration::from_secs(3)).await;
    // A and B are past their TTL, C is not.
    assert_eq!(cache.sweep(), 2);

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.swept, 2);
    assert_eq!(cache.get(&request("C")).as_deref(), Some("c"));
}

// ============================================================================
// Size bound
// ============================================================================

/// With max_entries = 2, inserting fingerprints A, B, C in order evicts
/// exactly the oldest-inserted one; the stored count never exceeds the
/// bound.
#[tokio::test(start_paused = true)]
async fn size_bound_evicts_oldest_inserted() {
    let cache = cache_with(3600, 2);
    cache.insert(&request("A"), "a");
    cache.insert(&request("B"), "b");
    cache.insert(&request("C"), "c");

    let stats = cache.stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.evictions, 1);

    assert_eq!(cache.get(&request("A")), None);
    assert_eq!(cache.get(&request("B")).as_deref(), Some("b"));
    assert_eq!(cache.get(&request("C")).as_deref(), Some("c"));
}

/// Eviction follows insertion order, not recency: a recently read entry
/// is still evicted first if it was inserted first.
#[tokio::test(start_paused = true)]
async fn eviction_ignores_read_recency() {
    let cache = cache_with(3600, 2);
    cache.insert(&request("A"), "a");
    cache.insert(&request("B"), "b");

    assert!(cache.get(&request("A")).is_some());

    cache.insert(&request("C"), "c");
    assert_eq!(cache.get(&request("A")), None, "A evicted despite recent read");
    assert!(cache.get(&request("B")).is_some());
}

// ============================================================================
// Fingerprint sharing
// ============================================================================

/// Requests differing only in highlight order (or in fields the
/// fingerprint excludes) share a cache slot.
#[tokio::test(start_paused = true)]
async fn near_duplicate_requests_share_a_slot() {
    let cache = cache_with(3600, 100);
    let original = request("Inn").highlights(["pool", "breakfast"]);
    cache.insert(&original, "text");

    let reordered = request("Inn").highlights(["breakfast", "pool"]);
    assert_eq!(cache.get(&reordered).as_deref(), Some("text"));

    let different_voice = request("Inn")
        .highlights(["pool", "breakfast"])
        .language("de")
        .guest_count(4);
    assert_eq!(cache.get(&different_voice).as_deref(), Some("text"));
}
