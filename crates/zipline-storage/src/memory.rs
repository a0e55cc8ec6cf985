use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use zipline_core::repository::Result;
use zipline_core::{Clock, ShortCode, StorageError, SystemClock, UrlRecord, UrlRepository};

/// In-memory implementation of the repository contract using DashMap.
///
/// DashMap's sharded locks allow concurrent reads and writes to
/// different buckets without blocking, matching the stateless-handler
/// concurrency model of the services.
///
/// Expired entries are dropped lazily on read, which stands in for the
/// TTL-indexed physical deletion of the MySQL backend. A read counter
/// tracks `find_by_code` calls so tests can observe whether the cache
/// in front of this store actually absorbed a lookup.
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
    clock: Arc<dyn Clock>,
    reads: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a repository on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a repository driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
            reads: AtomicU64::new(0),
        }
    }

    /// Number of `find_by_code` lookups served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for InMemoryRepository {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let key = code.as_str();

        let Some(entry) = self.storage.get(key) else {
            return Ok(None);
        };

        if entry.is_expired(self.clock.now()) {
            drop(entry);
            self.storage.remove(key);
            return Ok(None);
        }

        Ok(Some(entry.clone()))
    }

    async fn find_reusable(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let now = self.clock.now();

        let found = self.storage.iter().find_map(|entry| {
            let record = entry.value();
            if !record.is_custom_ttl && record.original_url == original_url && !record.is_expired(now)
            {
                Some(record.clone())
            } else {
                None
            }
        });

        Ok(found)
    }

    async fn insert(&self, record: UrlRecord) -> Result<()> {
        let key = record.code.as_str().to_owned();
        let now = self.clock.now();

        // The conflict check and the write happen under one shard lock,
        // so racing inserts of the same code cannot both win.
        match self.storage.entry(key) {
            Entry::Occupied(entry) if !entry.get().is_expired(now) => {
                Err(StorageError::Conflict(record.code.to_string()))
            }
            Entry::Occupied(mut entry) => {
                entry.insert(record);
                Ok(())
            }
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }
}
