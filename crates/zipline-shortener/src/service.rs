use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use zipline_core::{
    Clock, ShortCode, ShortenError, ShortenRequest, Shortener, StorageError, SystemClock, UrlCache,
    UrlRecord, UrlRepository, DEFAULT_TTL,
};
use zipline_generator::Generator;

/// How many codes to mint before giving up on a free slot. With a
/// 62^8 space a single conflict is already extraordinary.
const MAX_GENERATE_ATTEMPTS: u32 = 3;

/// A concrete implementation of the [`Shortener`] trait.
///
/// The write path is two independent operations: the store insert is
/// authoritative and its failure fails the request; the cache set is
/// write-through acceleration and its failure only costs a future
/// cache miss. No transaction spans the two — a crash in between
/// leaves the store correct and the cache cold, which self-heals on
/// the next resolve.
#[derive(Clone)]
pub struct ShortenerService<R, C, G> {
    repository: Arc<R>,
    cache: Arc<C>,
    generator: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<R: UrlRepository, C: UrlCache, G: Generator> ShortenerService<R, C, G> {
    /// Creates a service on the system clock.
    pub fn new(repository: Arc<R>, cache: Arc<C>, generator: Arc<G>) -> Self {
        Self::with_clock(repository, cache, generator, Arc::new(SystemClock))
    }

    /// Creates a service driven by the given clock.
    pub fn with_clock(
        repository: Arc<R>,
        cache: Arc<C>,
        generator: Arc<G>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            cache,
            generator,
            clock,
        }
    }

    /// Inserts a freshly generated record, regenerating the code on a
    /// uniqueness conflict up to [`MAX_GENERATE_ATTEMPTS`] times.
    async fn insert_with_fresh_code(
        &self,
        original_url: &str,
        is_custom_ttl: bool,
        expire_after: std::time::Duration,
    ) -> Result<ShortCode, ShortenError> {
        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let code = self.generator.generate(original_url)?;
            let record = UrlRecord {
                code: code.clone(),
                original_url: original_url.to_owned(),
                is_custom_ttl,
                created_at: self.clock.now(),
                expire_after,
            };

            match self.repository.insert(record).await {
                Ok(()) => return Ok(code),
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %code, attempt, "generated code collided, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ShortenError::CodeExhausted {
            attempts: MAX_GENERATE_ATTEMPTS,
        })
    }
}

#[async_trait]
impl<R: UrlRepository, C: UrlCache, G: Generator> Shortener for ShortenerService<R, C, G> {
    async fn shorten(&self, request: ShortenRequest) -> Result<ShortCode, ShortenError> {
        // A default-TTL submission reuses an existing live mapping for
        // the same URL. The TTL is fixed at creation; reuse does not
        // extend it. Custom-TTL submissions always mint a new code.
        let expire_after = match request.custom_ttl {
            None => {
                if let Some(existing) = self.repository.find_reusable(&request.original_url).await?
                {
                    debug!(code = %existing.code, "reusing existing mapping");
                    return Ok(existing.code);
                }
                DEFAULT_TTL
            }
            Some(ttl) => match ttl.as_duration() {
                Some(duration) if !duration.is_zero() => duration,
                // Zero and overflowing TTLs are both unusable input.
                _ => return Err(ShortenError::InvalidTtl),
            },
        };

        let code = self
            .insert_with_fresh_code(
                &request.original_url,
                request.custom_ttl.is_some(),
                expire_after,
            )
            .await?;

        // Write-through: same TTL as the record, so the cache entry
        // can never outlive the store row. Failure here is tolerated;
        // the store remains authoritative.
        if let Err(e) = self
            .cache
            .set(&code, &request.original_url, expire_after)
            .await
        {
            warn!(code = %code, error = %e, "cache write failed, continuing");
        }

        debug!(code = %code, custom = request.custom_ttl.is_some(), "created mapping");
        Ok(code)
    }
}
