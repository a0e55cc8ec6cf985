use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, CacheError>;

/// The volatile cache contract: a TTL-bounded `code -> original URL`
/// lookup in front of the durable store.
///
/// The cache is best-effort acceleration, never a source of truth.
/// Entries are only written with a TTL no greater than the remaining
/// lifetime of the backing record, so a cache hit can always be served
/// without consulting the store.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Looks up the original URL for a code.
    ///
    /// `Ok(None)` is a genuine miss; `Err` means the backend failed,
    /// which callers should log and degrade from rather than treat as
    /// a miss.
    async fn get(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Stores a `code -> url` entry that evicts after `ttl`.
    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()>;
}
