use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use zipline_core::repository::Result;
use zipline_core::{ShortCode, StorageError, UrlRecord, UrlRepository};

/// Default bound on any single database operation.
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// MySQL implementation of the repository contract.
///
/// Liveness is enforced at read time: every lookup filters on
/// `expire_at`, so an expired row behaves as if it were already gone.
/// [`purge_expired`](MySqlRepository::purge_expired) physically deletes
/// dead rows and is intended to run periodically, standing in for a
/// TTL index.
///
/// Every operation is wrapped in a bounded timeout; a slow backend
/// surfaces as `StorageError::Timeout` instead of hanging the request.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
    op_timeout: Duration,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    ///
    /// The pool is shared by all requests; handlers never open
    /// per-request connections.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(DEFAULT_OP_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Overrides the per-operation timeout.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))
    }

    /// Physically deletes rows whose lifetime has elapsed.
    ///
    /// Returns the number of rows removed. Reads are already filtered
    /// on expiry, so this only reclaims space.
    pub async fn purge_expired(&self) -> Result<u64> {
        let now = now_unix_seconds();

        let result = self
            .bounded(
                sqlx::query("DELETE FROM short_urls WHERE expire_at <= ?")
                    .bind(now)
                    .execute(&self.pool),
            )
            .await?
            .map_err(map_sqlx_error)?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged, "purged expired short urls");
        }
        Ok(purged)
    }

    /// Runs a storage future under the configured timeout.
    async fn bounded<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| {
                StorageError::Timeout(format!(
                    "operation exceeded {} ms",
                    self.op_timeout.as_millis()
                ))
            })
    }
}

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &sqlx::mysql::MySqlRow) -> Result<UrlRecord> {
    let code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let is_custom_ttl: bool = row.try_get("is_custom_ttl").map_err(map_sqlx_error)?;
    let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let expire_at_raw: i64 = row.try_get("expire_at").map_err(map_sqlx_error)?;

    let created_at = Timestamp::from_second(created_at_raw).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at '{created_at_raw}': {e}"))
    })?;
    let lifetime = expire_at_raw - created_at_raw;
    if lifetime <= 0 {
        return Err(StorageError::InvalidData(format!(
            "non-positive lifetime for code '{code}'"
        )));
    }

    Ok(UrlRecord {
        code: ShortCode::new_unchecked(code),
        original_url,
        is_custom_ttl,
        created_at,
        expire_after: Duration::from_secs(lifetime as u64),
    })
}

#[async_trait]
impl UrlRepository for MySqlRepository {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let now = now_unix_seconds();

        let row = self
            .bounded(
                sqlx::query(
                    r#"
                    SELECT short_code, original_url, is_custom_ttl, created_at, expire_at
                    FROM short_urls
                    WHERE short_code = ?
                      AND expire_at > ?
                    LIMIT 1
                    "#,
                )
                .bind(code.as_str())
                .bind(now)
                .fetch_optional(&self.pool),
            )
            .await?
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_reusable(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let now = now_unix_seconds();

        let row = self
            .bounded(
                sqlx::query(
                    r#"
                    SELECT short_code, original_url, is_custom_ttl, created_at, expire_at
                    FROM short_urls
                    WHERE original_url = ?
                      AND is_custom_ttl = FALSE
                      AND expire_at > ?
                    ORDER BY created_at
                    LIMIT 1
                    "#,
                )
                .bind(original_url)
                .bind(now)
                .fetch_optional(&self.pool),
            )
            .await?
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn insert(&self, record: UrlRecord) -> Result<()> {
        let created_at = record.created_at.as_second();
        let expire_at = record.expires_at().as_second();

        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    INSERT INTO short_urls (short_code, original_url, is_custom_ttl, created_at, expire_at)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(record.code.as_str())
                .bind(&record.original_url)
                .bind(record.is_custom_ttl)
                .bind(created_at)
                .bind(expire_at)
                .execute(&self.pool),
            )
            .await?;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
