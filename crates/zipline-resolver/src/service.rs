use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use zipline_core::{
    Clock, ResolveError, Resolver, ShortCode, SystemClock, UrlCache, UrlRepository,
};

/// A concrete implementation of the [`Resolver`] trait.
///
/// The hot path is a single cache lookup; the store is only consulted
/// on a miss. A cache *backend error* is not a miss — it is logged and
/// degraded to a store lookup so an unavailable cache costs latency,
/// not correctness. The store is the source of truth; cache
/// repopulation after a fallback hit is best-effort.
#[derive(Clone)]
pub struct ResolverService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R: UrlRepository, C: UrlCache> ResolverService<R, C> {
    /// Creates a service on the system clock.
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self::with_clock(repository, cache, Arc::new(SystemClock))
    }

    /// Creates a service driven by the given clock.
    pub fn with_clock(repository: Arc<R>, cache: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            cache,
            clock,
        }
    }
}

#[async_trait]
impl<R: UrlRepository, C: UrlCache> Resolver for ResolverService<R, C> {
    async fn resolve(&self, code: &ShortCode) -> Result<Option<String>, ResolveError> {
        trace!(code = %code, "resolving short code");

        match self.cache.get(code).await {
            Ok(Some(url)) => {
                debug!(code = %code, "cache hit");
                return Ok(Some(url));
            }
            Ok(None) => {
                trace!(code = %code, "cache miss, falling back to store");
            }
            Err(e) => {
                warn!(code = %code, error = %e, "cache lookup failed, degrading to store");
            }
        }

        let Some(record) = self.repository.find_by_code(code).await? else {
            debug!(code = %code, "short code not found or expired");
            return Ok(None);
        };

        // Repopulate with the record's remaining lifetime so the cache
        // entry can never outlive the durable row. The repository only
        // returns live records, but the lifetime is re-checked here
        // against this service's clock before caching.
        match record.remaining_ttl(self.clock.now()) {
            Some(ttl) => {
                if let Err(e) = self.cache.set(code, &record.original_url, ttl).await {
                    warn!(code = %code, error = %e, "cache repopulation failed, continuing");
                }
            }
            None => {
                debug!(code = %code, "record expired");
                return Ok(None);
            }
        }

        debug!(code = %code, url = %record.original_url, "resolved from store");
        Ok(Some(record.original_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use std::time::Duration;
    use zipline_cache::InMemoryUrlCache;
    use zipline_core::{CacheError, ManualClock, UrlRecord};
    use zipline_storage::InMemoryRepository;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(code_str: &str, url: &str, created_at: Timestamp) -> UrlRecord {
        UrlRecord {
            code: code(code_str),
            original_url: url.to_string(),
            is_custom_ttl: false,
            created_at,
            expire_after: Duration::from_secs(3_600),
        }
    }

    fn service_at_epoch() -> (
        ResolverService<InMemoryRepository, InMemoryUrlCache>,
        Arc<InMemoryRepository>,
        Arc<InMemoryUrlCache>,
        ManualClock,
    ) {
        let clock = ManualClock::at_epoch();
        let repo = Arc::new(InMemoryRepository::with_clock(Arc::new(clock.clone())));
        let cache = Arc::new(InMemoryUrlCache::with_clock(Arc::new(clock.clone())));
        let service = ResolverService::with_clock(
            Arc::clone(&repo),
            Arc::clone(&cache),
            Arc::new(clock.clone()),
        );
        (service, repo, cache, clock)
    }

    #[tokio::test]
    async fn resolve_from_cache_skips_store() {
        let (service, repo, cache, _clock) = service_at_epoch();
        let c = code("abc12345");

        cache
            .set(&c, "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        let url = service.resolve(&c).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(repo.read_count(), 0);
    }

    #[tokio::test]
    async fn resolve_falls_back_to_store_and_repopulates() {
        let (service, repo, _cache, clock) = service_at_epoch();
        let c = code("abc12345");

        repo.insert(record("abc12345", "https://example.com", clock.now()))
            .await
            .unwrap();

        let url = service.resolve(&c).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(repo.read_count(), 1);

        // Second resolve is served from the repopulated cache.
        let url = service.resolve(&c).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(repo.read_count(), 1);
    }

    #[tokio::test]
    async fn repopulated_entry_carries_remaining_lifetime() {
        let (service, repo, cache, clock) = service_at_epoch();
        let c = code("abc12345");

        repo.insert(record("abc12345", "https://example.com", clock.now()))
            .await
            .unwrap();

        // Half the record's hour has passed before the cache is warmed.
        clock.advance(Duration::from_secs(1_800));
        service.resolve(&c).await.unwrap();

        // The cache entry must die with the record, not an hour from
        // the warm-up.
        clock.advance(Duration::from_secs(1_800));
        assert!(cache.get(&c).await.unwrap().is_none());
        assert_eq!(service.resolve(&c).await.unwrap(), None);
    }

    #[tokio::test]
    async fn resolve_unknown_code_is_none() {
        let (service, _repo, _cache, _clock) = service_at_epoch();

        let url = service.resolve(&code("nope1234")).await.unwrap();
        assert!(url.is_none());
    }

    #[tokio::test]
    async fn resolve_expired_record_is_none() {
        let (service, repo, _cache, clock) = service_at_epoch();
        let c = code("abc12345");

        repo.insert(record("abc12345", "https://example.com", clock.now()))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(3_601));
        assert_eq!(service.resolve(&c).await.unwrap(), None);
    }

    /// A cache that errors on reads but records writes.
    struct FlakyCache {
        inner: InMemoryUrlCache,
    }

    #[async_trait]
    impl UrlCache for FlakyCache {
        async fn get(&self, _code: &ShortCode) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("down".to_string()))
        }

        async fn set(
            &self,
            code: &ShortCode,
            url: &str,
            ttl: Duration,
        ) -> Result<(), CacheError> {
            self.inner.set(code, url, ttl).await
        }
    }

    #[tokio::test]
    async fn cache_error_degrades_to_store() {
        let clock = ManualClock::at_epoch();
        let repo = Arc::new(InMemoryRepository::with_clock(Arc::new(clock.clone())));
        let cache = Arc::new(FlakyCache {
            inner: InMemoryUrlCache::with_clock(Arc::new(clock.clone())),
        });
        let service = ResolverService::with_clock(
            Arc::clone(&repo),
            Arc::clone(&cache),
            Arc::new(clock.clone()),
        );

        let c = code("abc12345");
        repo.insert(record("abc12345", "https://example.com", clock.now()))
            .await
            .unwrap();

        // An unavailable cache is not a miss and not a failure: the
        // lookup degrades to the store and still answers.
        let url = service.resolve(&c).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(repo.read_count(), 1);
    }
}
