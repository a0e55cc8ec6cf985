use crate::error::{ResolveError, ShortenError};
use crate::record::CustomTtl;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Parameters for creating a shortened URL.
///
/// The boundary layer is responsible for URL syntax validation before
/// constructing a request; the core treats `original_url` as an opaque
/// absolute URL.
#[derive(Debug, Clone)]
pub struct ShortenRequest {
    /// The original URL to be shortened.
    pub original_url: String,
    /// Caller-specified expiry. `None` uses the default policy and
    /// enables idempotent reuse; `Some` always mints a fresh code.
    pub custom_ttl: Option<CustomTtl>,
}

impl ShortenRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            custom_ttl: None,
        }
    }

    pub fn with_custom_ttl(original_url: impl Into<String>, ttl: CustomTtl) -> Self {
        Self {
            original_url: original_url.into(),
            custom_ttl: Some(ttl),
        }
    }
}

/// The shortening service contract.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Maps a URL to a short code, reusing an existing live mapping
    /// when the request carries no custom TTL.
    async fn shorten(&self, request: ShortenRequest) -> Result<ShortCode, ShortenError>;
}

/// The resolution service contract.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves a short code back to its original URL.
    ///
    /// `Ok(None)` means the code never existed or has expired; that is
    /// a normal outcome, not an error.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<String>, ResolveError>;
}
