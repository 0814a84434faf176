//! Transaction Repository Module
//!
//! Persistence of [`TransactionRecord`]s keyed by `(hash, network)`, with the
//! secondary lookups the lineage engine and the history query need.
//!
//! ## Repository Implementations
//!
//! - [`InMemoryTransactionRepository`]: process-local storage for development and tests
//! - [`RedisTransactionRepository`]: Redis-backed storage for production environments
//!
mod transaction_in_memory;
mod transaction_redis;

use redis::aio::ConnectionManager;
pub use transaction_in_memory::*;
pub use transaction_redis::*;

use crate::models::{
    HistoryFilter, Network, RecordKey, RepositoryError, TransactionRecord,
    TransactionRecordUpdate,
};
use async_trait::async_trait;
use itertools::Itertools;
use std::sync::Arc;

/// A trait defining transaction repository operations
#[async_trait]
pub trait TransactionRepository {
    /// Find the record for a `(hash, network)` pair
    async fn find_by_key(&self, key: &RecordKey)
        -> Result<Option<TransactionRecord>, RepositoryError>;

    /// Find records whose `oldHash` equals `old_hash` on `network`
    async fn find_by_old_hash(
        &self,
        network: Network,
        old_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError>;

    /// Find records whose `newHash` equals `new_hash` on `network`
    async fn find_by_new_hash(
        &self,
        network: Network,
        new_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError>;

    /// Records sent from `filter.from`, newest first, windowed by `filter.page`
    async fn find_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionRecord>, RepositoryError>;

    /// Insert or replace the record stored under the record's key
    async fn upsert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError>;

    /// Update an existing record; `None` when nothing is stored under `key`
    async fn partial_update(
        &self,
        key: &RecordKey,
        update: TransactionRecordUpdate,
    ) -> Result<Option<TransactionRecord>, RepositoryError>;

    /// Write every record in one atomic batch
    async fn save_all(&self, records: Vec<TransactionRecord>) -> Result<(), RepositoryError>;

    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// Carries storage bookkeeping from the stored copy onto the record being written.
pub(crate) fn prepare_write(
    existing: Option<&TransactionRecord>,
    mut record: TransactionRecord,
) -> TransactionRecord {
    match existing {
        Some(stored) => {
            record.id = stored.id.clone();
            record.version = stored.version + 1;
        }
        None => record.version = 1,
    }
    record
}

/// Applies history filters, ordering and the page window to candidate records.
pub(crate) fn page_history<I>(records: I, filter: &HistoryFilter) -> Vec<TransactionRecord>
where
    I: IntoIterator<Item = TransactionRecord>,
{
    records
        .into_iter()
        .filter(|r| r.from.as_deref() == Some(filter.from.as_str()))
        .filter(|r| r.matches(&filter.filters))
        .sorted_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.key().cmp(&b.key()))
        })
        .skip(filter.page.skip)
        .take(filter.page.count)
        .collect()
}

#[cfg(test)]
mockall::mock! {
  pub TransactionRepository {}

  #[async_trait]
  impl TransactionRepository for TransactionRepository {
      async fn find_by_key(&self, key: &RecordKey) -> Result<Option<TransactionRecord>, RepositoryError>;
      async fn find_by_old_hash(&self, network: Network, old_hash: &str) -> Result<Vec<TransactionRecord>, RepositoryError>;
      async fn find_by_new_hash(&self, network: Network, new_hash: &str) -> Result<Vec<TransactionRecord>, RepositoryError>;
      async fn find_history(&self, filter: &HistoryFilter) -> Result<Vec<TransactionRecord>, RepositoryError>;
      async fn upsert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError>;
      async fn partial_update(&self, key: &RecordKey, update: TransactionRecordUpdate) -> Result<Option<TransactionRecord>, RepositoryError>;
      async fn save_all(&self, records: Vec<TransactionRecord>) -> Result<(), RepositoryError>;
      async fn count(&self) -> Result<usize, RepositoryError>;
  }
}

/// Enum wrapper for different transaction repository implementations
#[derive(Debug)]
pub enum TransactionRepositoryStorage {
    InMemory(InMemoryTransactionRepository),
    Redis(RedisTransactionRepository),
}

impl TransactionRepositoryStorage {
    pub fn new_in_memory() -> Self {
        Self::InMemory(InMemoryTransactionRepository::new())
    }

    pub fn new_redis(
        connection_manager: Arc<ConnectionManager>,
        key_prefix: String,
    ) -> Result<Self, RepositoryError> {
        Ok(Self::Redis(RedisTransactionRepository::new(
            connection_manager,
            key_prefix,
        )?))
    }
}

#[async_trait]
impl TransactionRepository for TransactionRepositoryStorage {
    async fn find_by_key(
        &self,
        key: &RecordKey,
    ) -> Result<Option<TransactionRecord>, RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => repo.find_by_key(key).await,
            TransactionRepositoryStorage::Redis(repo) => repo.find_by_key(key).await,
        }
    }

    async fn find_by_old_hash(
        &self,
        network: Network,
        old_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => {
                repo.find_by_old_hash(network, old_hash).await
            }
            TransactionRepositoryStorage::Redis(repo) => {
                repo.find_by_old_hash(network, old_hash).await
            }
        }
    }

    async fn find_by_new_hash(
        &self,
        network: Network,
        new_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => {
                repo.find_by_new_hash(network, new_hash).await
            }
            TransactionRepositoryStorage::Redis(repo) => {
                repo.find_by_new_hash(network, new_hash).await
            }
        }
    }

    async fn find_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => repo.find_history(filter).await,
            TransactionRepositoryStorage::Redis(repo) => repo.find_history(filter).await,
        }
    }

    async fn upsert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => repo.upsert(record).await,
            TransactionRepositoryStorage::Redis(repo) => repo.upsert(record).await,
        }
    }

    async fn partial_update(
        &self,
        key: &RecordKey,
        update: TransactionRecordUpdate,
    ) -> Result<Option<TransactionRecord>, RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => repo.partial_update(key, update).await,
            TransactionRepositoryStorage::Redis(repo) => repo.partial_update(key, update).await,
        }
    }

    async fn save_all(&self, records: Vec<TransactionRecord>) -> Result<(), RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => repo.save_all(records).await,
            TransactionRepositoryStorage::Redis(repo) => repo.save_all(records).await,
        }
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        match self {
            TransactionRepositoryStorage::InMemory(repo) => repo.count().await,
            TransactionRepositoryStorage::Redis(repo) => repo.count().await,
        }
    }
}
