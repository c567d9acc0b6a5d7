use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Rates fetched for one date key, stamped with the fetch time. Replaced
/// wholesale on refresh, never partially mutated.
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub rates: HashMap<String, f64>,
    pub fetched_at: DateTime<Utc>,
}

/// In-process cache of rate snapshots keyed by date ("latest" or YYYY-MM-DD).
///
/// A snapshot older than `duration` is treated as absent; it stays in the map
/// until the next successful fetch overwrites it. The entry count is bounded:
/// a put at capacity first drops expired snapshots, then the oldest one.
#[derive(Clone)]
pub struct RateCache {
    inner: Arc<Mutex<HashMap<String, RateSnapshot>>>,
    duration: Duration,
    max_entries: usize,
}

impl RateCache {
    pub fn new(duration: Duration, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            duration,
            max_entries,
        }
    }

    /// Returns the cached rates for `key` if present and still valid at `now`.
    pub async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<HashMap<String, f64>> {
        let cache = self.inner.lock().await;
        match cache.get(key) {
            Some(snapshot) if now - snapshot.fetched_at < self.duration => {
                debug!(key, "Cache HIT");
                Some(snapshot.rates.clone())
            }
            Some(_) => {
                debug!(key, "Cache STALE");
                None
            }
            None => {
                debug!(key, "Cache MISS");
                None
            }
        }
    }

    /// Unconditionally stores/replaces the snapshot for `key`.
    pub async fn put(&self, key: &str, rates: HashMap<String, f64>, now: DateTime<Utc>) {
        let mut cache = self.inner.lock().await;
        if !cache.contains_key(key) && cache.len() >= self.max_entries {
            cache.retain(|_, snapshot| now - snapshot.fetched_at < self.duration);
            if cache.len() >= self.max_entries {
                let oldest = cache
                    .iter()
                    .min_by_key(|(_, snapshot)| snapshot.fetched_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    debug!(key = %oldest, "Cache EVICT");
                    cache.remove(&oldest);
                }
            }
        }
        debug!(key, "Cache PUT");
        cache.insert(
            key.to_string(),
            RateSnapshot {
                rates,
                fetched_at: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    #[tokio::test]
    async fn test_get_put_within_duration() {
        let cache = RateCache::new(Duration::seconds(3600), 16);
        let t0 = Utc::now();

        assert!(cache.get("latest", t0).await.is_none());

        cache.put("latest", rates(&[("EUR", 0.9)]), t0).await;

        let cached = cache
            .get("latest", t0 + Duration::seconds(3599))
            .await
            .unwrap();
        assert_eq!(cached.get("EUR"), Some(&0.9));
    }

    #[tokio::test]
    async fn test_stale_entry_behaves_as_absent() {
        let cache = RateCache::new(Duration::seconds(3600), 16);
        let t0 = Utc::now();

        cache.put("latest", rates(&[("EUR", 0.9)]), t0).await;

        // Exactly at the boundary the entry is no longer valid.
        assert!(cache.get("latest", t0 + Duration::seconds(3600)).await.is_none());

        // A fresh put overwrites the stale snapshot and revalidates the key.
        let t1 = t0 + Duration::seconds(7200);
        cache.put("latest", rates(&[("EUR", 0.95)]), t1).await;
        let cached = cache.get("latest", t1).await.unwrap();
        assert_eq!(cached.get("EUR"), Some(&0.95));
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let cache = RateCache::new(Duration::seconds(3600), 16);
        let t0 = Utc::now();

        cache.put("latest", rates(&[("EUR", 0.9)]), t0).await;
        cache.put("2024-01-15", rates(&[("EUR", 0.85)]), t0).await;

        assert_eq!(
            cache.get("latest", t0).await.unwrap().get("EUR"),
            Some(&0.9)
        );
        assert_eq!(
            cache.get("2024-01-15", t0).await.unwrap().get("EUR"),
            Some(&0.85)
        );
    }

    #[tokio::test]
    async fn test_put_at_capacity_evicts_oldest() {
        let cache = RateCache::new(Duration::seconds(3600), 2);
        let t0 = Utc::now();

        cache.put("2024-01-01", rates(&[("EUR", 0.1)]), t0).await;
        cache
            .put("2024-01-02", rates(&[("EUR", 0.2)]), t0 + Duration::seconds(1))
            .await;
        cache
            .put("2024-01-03", rates(&[("EUR", 0.3)]), t0 + Duration::seconds(2))
            .await;

        let now = t0 + Duration::seconds(3);
        assert!(cache.get("2024-01-01", now).await.is_none());
        assert!(cache.get("2024-01-02", now).await.is_some());
        assert!(cache.get("2024-01-03", now).await.is_some());
    }

    #[tokio::test]
    async fn test_put_at_capacity_prefers_dropping_expired() {
        let cache = RateCache::new(Duration::seconds(3600), 2);
        let t0 = Utc::now();

        cache.put("2024-01-01", rates(&[("EUR", 0.1)]), t0).await;
        cache
            .put("2024-01-02", rates(&[("EUR", 0.2)]), t0 + Duration::seconds(4000))
            .await;

        // The first entry is expired by now and is the one reclaimed.
        let t1 = t0 + Duration::seconds(4100);
        cache.put("2024-01-03", rates(&[("EUR", 0.3)]), t1).await;

        assert!(cache.get("2024-01-02", t1).await.is_some());
        assert!(cache.get("2024-01-03", t1).await.is_some());
    }
}
