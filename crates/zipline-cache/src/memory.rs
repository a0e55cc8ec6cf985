use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;
use zipline_core::cache::Result;
use zipline_core::{Clock, ShortCode, SystemClock, UrlCache};

#[derive(Debug, Clone)]
struct Entry {
    url: String,
    expires_at: Timestamp,
}

/// In-memory implementation of [`UrlCache`] using DashMap.
///
/// Eviction is lazy: an entry past its deadline is dropped on the next
/// read. The clock is injected so expiry can be driven by simulated
/// time in tests; this is also why the implementation is not built on
/// a wall-clock TTL cache.
pub struct InMemoryUrlCache {
    storage: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUrlCache {
    /// Creates a cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a cache driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }

    /// Drops every entry, as if the cache backend had restarted.
    pub fn flush(&self) {
        self.storage.clear();
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for InMemoryUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for InMemoryUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = code.as_str();

        let Some(entry) = self.storage.get(key) else {
            trace!(code = %code, "cache miss");
            return Ok(None);
        };

        if self.clock.now() >= entry.expires_at {
            drop(entry);
            self.storage.remove(key);
            trace!(code = %code, "cache entry expired");
            return Ok(None);
        }

        Ok(Some(entry.url.clone()))
    }

    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        let expires_at = self.clock.now() + SignedDuration::from_secs(ttl.as_secs() as i64);
        self.storage.insert(
            code.as_str().to_owned(),
            Entry {
                url: url.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipline_core::ManualClock;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn cache_at_epoch() -> (InMemoryUrlCache, ManualClock) {
        let clock = ManualClock::at_epoch();
        let cache = InMemoryUrlCache::with_clock(Arc::new(clock.clone()));
        (cache, clock)
    }

    #[tokio::test]
    async fn set_and_get() {
        let (cache, _clock) = cache_at_epoch();
        let c = code("abc12345");

        assert!(cache.get(&c).await.unwrap().is_none());

        cache
            .set(&c, "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get(&c).await.unwrap(),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn entry_expires_with_clock() {
        let (cache, clock) = cache_at_epoch();
        let c = code("abc12345");

        cache
            .set(&c, "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(59));
        assert!(cache.get(&c).await.unwrap().is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get(&c).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_dropped_on_read() {
        let (cache, clock) = cache_at_epoch();
        let c = code("abc12345");

        cache
            .set(&c, "https://example.com", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);

        clock.advance(Duration::from_secs(11));
        let _ = cache.get(&c).await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn overwrite_replaces_ttl() {
        let (cache, clock) = cache_at_epoch();
        let c = code("abc12345");

        cache
            .set(&c, "https://example.com", Duration::from_secs(10))
            .await
            .unwrap();
        cache
            .set(&c, "https://example.com", Duration::from_secs(100))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(50));
        assert!(cache.get(&c).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn flush_clears_everything() {
        let (cache, _clock) = cache_at_epoch();

        for i in 0..5 {
            cache
                .set(
                    &code(&format!("code{:04}", i)),
                    "https://example.com",
                    Duration::from_secs(60),
                )
                .await
                .unwrap();
        }
        assert_eq!(cache.len(), 5);

        cache.flush();
        assert!(cache.is_empty());
        assert!(cache.get(&code("code0000")).await.unwrap().is_none());
    }
}
