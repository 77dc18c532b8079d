//! TTL 기반 메모리 캐시.
//!
//! `키 → (값, 조회 시각)`을 보관하고, 조회 시각이 TTL 안에 있을 때만 값을
//! 돌려줍니다. 만료된 항목은 다음 조회에서 새 값으로 완전히 교체되고, 저장할 때마다
//! 만료된 다른 키의 항목도 함께 정리됩니다.
//!
//! 시계는 `tokio::time::Instant`를 사용하므로 `start_paused` 테스트에서
//! `tokio::time::advance`로 만료를 재현할 수 있습니다.

use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::trace;

/// 캐시 항목.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// 캐시 통계.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub name: &'static str,
    pub ttl_secs: u64,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// TTL 캐시.
pub struct TtlCache<K, V> {
    name: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// TTL 안의 값을 조회합니다. 히트/미스 통계를 갱신합니다.
    pub async fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read().await;

        match entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl, now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(cache = self.name, "cache hit");
                Some(entry.value.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(cache = self.name, "cache miss");
                None
            }
        }
    }

    /// 값을 현재 시각으로 저장합니다. 기존 항목은 교체되고 만료된 항목은 삭제됩니다.
    pub async fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(self.ttl, now));
        let pruned = before - entries.len();
        if pruned > 0 {
            trace!(cache = self.name, pruned, "expired entries pruned");
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
            },
        );
    }

    /// 캐시에 유효한 값이 있으면 반환하고, 없으면 `fetch`로 가져와 저장합니다.
    ///
    /// `fetch`가 실패하면 아무것도 저장하지 않고 오류를 그대로 돌려줍니다.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// 모든 항목을 삭제합니다. 통계는 유지됩니다.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// TTL 안에 있는 항목 수.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_fresh(self.ttl, now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 만료 여부와 상관없이 저장된 항목 수.
    #[cfg(test)]
    async fn stored(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            name: self.name,
            ttl_secs: self.ttl.as_secs(),
            entries: self.len().await,
            hits,
            misses,
            hit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache: TtlCache<&str, u32> = TtlCache::new("test", Duration::from_secs(60));
        cache.insert("AAPL", 1).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"AAPL").await, Some(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&"AAPL").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_is_not_stored() {
        let cache: TtlCache<&str, u32> = TtlCache::new("test", Duration::from_secs(60));

        let result: Result<u32, &str> = cache
            .get_or_try_insert_with("AAPL", || async { Err("boom") })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);

        let result: Result<u32, &str> = cache
            .get_or_try_insert_with("AAPL", || async { Ok(7) })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_prunes_expired_keys() {
        let cache: TtlCache<String, u32> = TtlCache::new("prune", Duration::from_secs(60));
        for i in 0..10 {
            cache.insert(format!("T{}", i), i).await;
        }
        assert_eq!(cache.len().await, 10);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.stats().await.entries, 0);
        assert_eq!(cache.stored().await, 10);

        cache.insert("AAPL".to_string(), 1).await;
        assert_eq!(cache.stored().await, 1);
        assert_eq!(cache.get(&"AAPL".to_string()).await, Some(1));
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let cache: TtlCache<u8, u8> = TtlCache::new("stats", Duration::from_secs(300));
        cache.insert(1, 10).await;

        assert_eq!(cache.get(&1).await, Some(10));
        assert_eq!(cache.get(&2).await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.name, "stats");
        assert_eq!(stats.ttl_secs, 300);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);

        cache.clear().await;
        assert_eq!(cache.get(&1).await, None);
        assert_eq!(cache.stats().await.entries, 0);
    }
}
