use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

struct CachedEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
    last_used: u64,
}

struct CacheState<V> {
    entries: HashMap<String, CachedEntry<V>>,
    clock: u64,
}

impl<V> CacheState<V> {
    fn touch(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Bounded cache of fetched pages keyed by source URL.
///
/// Entries expire `ttl` after insertion. Once more than `capacity` entries
/// are held, the least recently used ones are evicted.
pub struct PageCache<V> {
    state: Arc<Mutex<CacheState<V>>>,
    capacity: usize,
    ttl: Duration,
}

impl<V: Clone> PageCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                clock: 0,
            })),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now()).await
    }

    pub async fn put(&self, key: String, value: V) {
        self.put_at(key, value, Utc::now()).await
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    async fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
        let mut state = self.state.lock().await;

        let expired = match state.entries.get(key) {
            Some(entry) => entry.expires_at <= now,
            None => return None,
        };
        if expired {
            state.entries.remove(key);
            return None;
        }

        let tick = state.touch();
        let entry = state.entries.get_mut(key)?;
        entry.last_used = tick;
        Some(entry.value.clone())
    }

    async fn put_at(&self, key: String, value: V, now: DateTime<Utc>) {
        let mut state = self.state.lock().await;

        let tick = state.touch();
        state.entries.insert(
            key,
            CachedEntry {
                value,
                expires_at: now
                    .checked_add_signed(self.ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
                last_used: tick,
            },
        );

        state.entries.retain(|_, entry| entry.expires_at > now);

        while state.entries.len() > self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    state.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_get_and_put() {
        let cache = PageCache::new(10, Duration::hours(1));
        assert_eq!(cache.get("a").await, None);

        cache.put("a".to_string(), 1).await;
        assert_eq!(cache.get("a").await, Some(1));

        cache.put("a".to_string(), 2).await;
        assert_eq!(cache.get("a").await, Some(2));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = PageCache::new(10, Duration::seconds(60));
        let now = start();

        cache.put_at("page".to_string(), "body", now).await;
        assert_eq!(cache.get_at("page", now + Duration::seconds(59)).await, Some("body"));
        assert_eq!(cache.get_at("page", now + Duration::seconds(60)).await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_least_recently_used_is_evicted() {
        let cache = PageCache::new(2, Duration::hours(1));
        let now = start();

        cache.put_at("a".to_string(), 1, now).await;
        cache.put_at("b".to_string(), 2, now).await;
        // Reading "a" makes "b" the eviction candidate
        assert_eq!(cache.get_at("a", now).await, Some(1));
        cache.put_at("c".to_string(), 3, now).await;

        assert_eq!(cache.get_at("a", now).await, Some(1));
        assert_eq!(cache.get_at("b", now).await, None);
        assert_eq!(cache.get_at("c", now).await, Some(3));
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped_before_lru() {
        let cache = PageCache::new(2, Duration::seconds(10));
        let now = start();

        cache.put_at("old".to_string(), 1, now).await;
        cache.put_at("fresh".to_string(), 2, now + Duration::seconds(8)).await;
        assert_eq!(cache.get_at("fresh", now + Duration::seconds(9)).await, Some(2));

        cache.put_at("new".to_string(), 3, now + Duration::seconds(11)).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get_at("fresh", now + Duration::seconds(11)).await, Some(2));
        assert_eq!(cache.get_at("new", now + Duration::seconds(11)).await, Some(3));
    }

    #[tokio::test]
    async fn test_ttl_past_end_of_calendar_does_not_overflow() {
        let cache = PageCache::new(2, Duration::MAX);
        let now = start();

        cache.put_at("page".to_string(), 1, now).await;
        assert_eq!(cache.get_at("page", now + Duration::days(365 * 1000)).await, Some(1));
    }
}
