use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, trace};
use zipline_core::cache::Result;
use zipline_core::{CacheError, ShortCode, UrlCache};

/// Default bound on any single cache operation.
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// A Redis-backed implementation of [`UrlCache`].
///
/// Entries are plain `code -> url` strings under a key prefix, expired
/// by Redis itself via `SET EX`. The multiplexed connection is cheap to
/// clone and shared across all requests.
#[derive(Debug, Clone)]
pub struct RedisUrlCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    op_timeout: Duration,
}

impl RedisUrlCache {
    /// Creates a new Redis URL cache with the default key prefix.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "zl:url:".to_string(),
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Creates a new Redis URL cache with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ..Self::new(conn)
        }
    }

    /// Overrides the per-operation timeout.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    fn cache_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }

    fn map_redis_error(err: redis::RedisError) -> CacheError {
        if err.is_timeout() {
            CacheError::Timeout(err.to_string())
        } else if err.is_connection_refusal() || err.is_io_error() || err.is_connection_dropped() {
            CacheError::Unavailable(err.to_string())
        } else {
            CacheError::Operation(err.to_string())
        }
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = self.cache_key(code);
        trace!(code = %code, "fetching url from redis");

        let mut conn = self.conn.clone();
        let lookup = tokio::time::timeout(self.op_timeout, conn.get::<_, Option<String>>(&key))
            .await
            .map_err(|_| {
                CacheError::Timeout(format!(
                    "GET exceeded {} ms",
                    self.op_timeout.as_millis()
                ))
            })?;

        match lookup {
            Ok(Some(url)) => {
                debug!(code = %code, "cache hit in redis");
                Ok(Some(url))
            }
            Ok(None) => {
                trace!(code = %code, "cache miss in redis");
                Ok(None)
            }
            Err(e) => Err(Self::map_redis_error(e)),
        }
    }

    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        let key = self.cache_key(code);
        trace!(code = %code, ttl_secs = ttl.as_secs(), "storing url in redis");

        // SET EX rejects a zero expiry; a sub-second remaining lifetime
        // still gets one second rather than an unbounded entry.
        let ttl_secs = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        let write = tokio::time::timeout(
            self.op_timeout,
            conn.set_ex::<_, _, ()>(&key, url, ttl_secs),
        )
        .await
        .map_err(|_| {
            CacheError::Timeout(format!(
                "SET exceeded {} ms",
                self.op_timeout.as_millis()
            ))
        })?;

        write.map_err(Self::map_redis_error)?;
        debug!(code = %code, "cached url in redis");
        Ok(())
    }
}

// Unit coverage for the cache contract lives against the in-memory
// implementation; exercising this type needs a running Redis instance.
