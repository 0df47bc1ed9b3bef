//! Integration Tests for the Cache API
//!
//! Exercises the public surface end to end with an injected clock.

use chrono::{Duration, TimeZone, Utc};
use ttl_lru::{CacheError, Clock, ManualClock, SharedCache, Timestamp, TtlCache};

// == Helper Functions ==

fn start() -> Timestamp {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn cache_with_clock<K, V>(capacity: usize) -> (TtlCache<K, V, ManualClock>, ManualClock)
where
    K: std::hash::Hash + Eq + Clone,
{
    let clock = ManualClock::new(start());
    (TtlCache::with_clock(capacity, clock.clone()), clock)
}

fn in_secs(clock: &ManualClock, secs: i64) -> Timestamp {
    clock.now() + Duration::seconds(secs)
}

// == Capacity ==

#[test]
fn test_size_never_exceeds_capacity() {
    let (mut cache, clock) = cache_with_clock(5);

    for key in 0..50u32 {
        cache.put(key, key, in_secs(&clock, 60)).unwrap();
        assert!(cache.size() <= 5);
    }
    assert_eq!(cache.size(), 5);
}

#[test]
fn test_zero_capacity_rejects_inserts() {
    let (mut cache, clock) = cache_with_clock::<&str, &str>(0);

    assert_eq!(
        cache.put("a", "1", in_secs(&clock, 60)),
        Err(CacheError::CapacityExhausted)
    );
    assert_eq!(cache.size(), 0);
}

#[test]
fn test_negative_capacity_is_invalid() {
    assert!(matches!(
        TtlCache::<u32, u32>::try_new(-5),
        Err(CacheError::InvalidConfiguration(_))
    ));
}

// == LRU ==

#[test]
fn test_lru_order_evicts_first_inserted() {
    let (mut cache, clock) = cache_with_clock(3);

    for key in ["a", "b", "c", "d"] {
        cache.put(key, key.to_uppercase(), in_secs(&clock, 60)).unwrap();
    }

    assert_eq!(cache.get(&"a"), Err(CacheError::KeyNotFound));
    for key in ["b", "c", "d"] {
        assert_eq!(cache.get(&key).unwrap(), &key.to_uppercase());
    }
}

#[test]
fn test_read_promotes_recency() {
    let (mut cache, clock) = cache_with_clock(2);

    cache.put("A", 1, in_secs(&clock, 60)).unwrap();
    cache.put("B", 2, in_secs(&clock, 60)).unwrap();
    cache.get(&"A").unwrap();
    cache.put("C", 3, in_secs(&clock, 60)).unwrap();

    assert_eq!(cache.get(&"B"), Err(CacheError::KeyNotFound));
    assert_eq!(cache.get(&"A"), Ok(&1));
    assert_eq!(cache.get(&"C"), Ok(&3));
}

#[test]
fn test_update_reuses_slot() {
    let (mut cache, clock) = cache_with_clock(2);

    cache.put("A", 1, in_secs(&clock, 60)).unwrap();
    cache.put("B", 2, in_secs(&clock, 60)).unwrap();
    cache.put("A", 10, in_secs(&clock, 60)).unwrap();

    assert_eq!(cache.size(), 2);
    assert_eq!(cache.get(&"A"), Ok(&10));
    assert_eq!(cache.get(&"B"), Ok(&2));
    assert_eq!(cache.stats().evictions, 0);
}

// == TTL ==

#[test]
fn test_ttl_expiry() {
    let (mut cache, clock) = cache_with_clock(4);

    cache.put("x", "v", in_secs(&clock, 1)).unwrap();
    clock.advance(Duration::seconds(2));

    assert_eq!(cache.get(&"x"), Err(CacheError::KeyNotFound));
    assert_eq!(cache.size(), 0);
}

#[test]
fn test_past_ttl_put_is_noop() {
    let (mut cache, clock) = cache_with_clock(4);
    cache.put("keep", "v", in_secs(&clock, 60)).unwrap();
    let before = cache.size();

    cache.put("y", "v", in_secs(&clock, -1)).unwrap();

    assert_eq!(cache.get(&"y"), Err(CacheError::KeyNotFound));
    assert_eq!(cache.size(), before);
}

#[test]
fn test_two_step_expiry_scenario() {
    let (mut cache, clock) = cache_with_clock(1);

    cache.put(1, "a", in_secs(&clock, 10)).unwrap();
    clock.advance(Duration::seconds(11));
    assert_eq!(cache.size(), 0);

    cache.put(1, "b", in_secs(&clock, 1)).unwrap();
    clock.advance(Duration::seconds(2));
    assert_eq!(cache.size(), 0);
}

#[test]
fn test_expired_entries_are_swept_before_eviction() {
    let (mut cache, clock) = cache_with_clock(2);

    cache.put("old", 1, in_secs(&clock, 60)).unwrap();
    cache.put("brief", 2, in_secs(&clock, 1)).unwrap();
    clock.advance(Duration::seconds(1));

    // "brief" expired, so there is room and "old" survives despite being LRU.
    cache.put("new", 3, in_secs(&clock, 60)).unwrap();

    assert_eq!(cache.get(&"old"), Ok(&1));
    assert_eq!(cache.get(&"new"), Ok(&3));
    let stats = cache.stats();
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.expirations, 1);
}

#[test]
fn test_many_keys_share_one_bucket() {
    let (mut cache, clock) = cache_with_clock(100);
    let deadline = in_secs(&clock, 5);

    for key in 0..50u32 {
        cache.put(key, key, deadline).unwrap();
    }
    cache.put(1000, 0, in_secs(&clock, 50)).unwrap();

    clock.advance(Duration::seconds(5));

    assert_eq!(cache.purge_expired(), 50);
    assert_eq!(cache.size(), 1);
}

// == Shared Handle ==

#[tokio::test]
async fn test_shared_cache_concurrent_writers_respect_capacity() {
    let clock = ManualClock::new(start());
    let cache = SharedCache::new(TtlCache::with_clock(16, clock.clone()));
    let deadline = clock.now() + Duration::seconds(60);

    let mut handles = Vec::new();
    for writer in 0..8u32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..100u32 {
                cache.put(writer * 100 + i, i, deadline).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.size().await, 16);
    let stats = cache.stats().await;
    assert_eq!(stats.evictions, 800 - 16);
}

#[tokio::test]
async fn test_shared_cache_expiry_with_manual_clock() {
    let clock = ManualClock::new(start());
    let cache = SharedCache::new(TtlCache::with_clock(4, clock.clone()));

    cache
        .put("session".to_string(), 7u32, clock.now() + Duration::seconds(30))
        .await
        .unwrap();
    assert_eq!(cache.get(&"session".to_string()).await, Ok(7));

    clock.advance(Duration::seconds(30));

    assert_eq!(
        cache.get(&"session".to_string()).await,
        Err(CacheError::KeyNotFound)
    );
    assert_eq!(cache.size().await, 0);
}
