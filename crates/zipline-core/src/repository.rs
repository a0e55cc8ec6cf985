use crate::error::StorageError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// The durable store contract: the authoritative mapping from short
/// code to URL record.
///
/// Implementations must only return *live* records from the lookup
/// methods; a record whose lifetime has elapsed behaves as if it never
/// existed. Physical removal of dead rows is an implementation detail
/// (TTL index, background purge, eviction on read).
#[async_trait]
pub trait UrlRepository: Send + Sync + 'static {
    /// Retrieves the live record for a short code, or `None` if the
    /// code does not exist or has expired.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Retrieves a live, default-TTL record for the given original URL.
    ///
    /// Used by the shortening service for idempotent reuse. Records
    /// created with a custom TTL are never returned here, so a
    /// short-lived custom link cannot be handed out for an unrelated
    /// default-TTL request.
    async fn find_reusable(&self, original_url: &str) -> Result<Option<UrlRecord>>;

    /// Inserts a new record. Returns `Err(Conflict)` if a live record
    /// with the same code already exists; the existing record is never
    /// overwritten.
    async fn insert(&self, record: UrlRecord) -> Result<()>;
}
