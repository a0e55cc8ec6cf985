use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors from the durable store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors from the volatile cache.
///
/// A cache miss is *not* an error; backends return `Ok(None)` for a
/// missing key and reserve these variants for real failures, so callers
/// can degrade to the store instead of treating an outage as a miss.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors from the short code generator.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    /// The base62 encoding of the digest came out shorter than a full
    /// code. With a 256-bit digest this is practically impossible, and
    /// the service fails the request rather than pad the code.
    #[error("digest encoding produced fewer than {expected} characters: got {actual}")]
    DigestTooShort { expected: usize, actual: usize },
}

/// Errors surfaced by the shortening service.
#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    #[error("custom TTL must be a positive, in-range duration")]
    InvalidTtl,
    #[error("could not find an unused short code after {attempts} attempts")]
    CodeExhausted { attempts: u32 },
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced by the resolution service.
///
/// A missing or expired code is not an error; `resolve` reports that as
/// `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
