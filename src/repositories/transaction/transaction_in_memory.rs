//! In-memory transaction repository.
//!
//! Records live in a `HashMap` behind a `tokio::sync::Mutex`; a batch write
//! happens inside a single lock scope, which makes it atomic for readers.
use crate::{
    models::{
        HistoryFilter, Network, RecordKey, RepositoryError, TransactionRecord,
        TransactionRecordUpdate,
    },
    repositories::{page_history, prepare_write, TransactionRepository},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    store: Mutex<HashMap<RecordKey, TransactionRecord>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire_lock<T>(lock: &Mutex<T>) -> Result<MutexGuard<T>, RepositoryError> {
        Ok(lock.lock().await)
    }

    fn write(
        store: &mut HashMap<RecordKey, TransactionRecord>,
        record: TransactionRecord,
    ) -> TransactionRecord {
        let key = record.key();
        let record = prepare_write(store.get(&key), record);
        store.insert(key, record.clone());
        record
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find_by_key(
        &self,
        key: &RecordKey,
    ) -> Result<Option<TransactionRecord>, RepositoryError> {
        let store = Self::acquire_lock(&self.store).await?;
        Ok(store.get(key).cloned())
    }

    async fn find_by_old_hash(
        &self,
        network: Network,
        old_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let store = Self::acquire_lock(&self.store).await?;
        Ok(store
            .values()
            .filter(|r| r.network == network && r.old_hash.as_deref() == Some(old_hash))
            .cloned()
            .collect())
    }

    async fn find_by_new_hash(
        &self,
        network: Network,
        new_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let store = Self::acquire_lock(&self.store).await?;
        Ok(store
            .values()
            .filter(|r| r.network == network && r.new_hash.as_deref() == Some(new_hash))
            .cloned()
            .collect())
    }

    async fn find_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let store = Self::acquire_lock(&self.store).await?;
        Ok(page_history(store.values().cloned(), filter))
    }

    async fn upsert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError> {
        let mut store = Self::acquire_lock(&self.store).await?;
        Ok(Self::write(&mut store, record))
    }

    async fn partial_update(
        &self,
        key: &RecordKey,
        update: TransactionRecordUpdate,
    ) -> Result<Option<TransactionRecord>, RepositoryError> {
        let mut store = Self::acquire_lock(&self.store).await?;
        let Some(mut record) = store.get(key).cloned() else {
            return Ok(None);
        };
        record.apply_partial_update(update);
        Ok(Some(Self::write(&mut store, record)))
    }

    async fn save_all(&self, records: Vec<TransactionRecord>) -> Result<(), RepositoryError> {
        let mut store = Self::acquire_lock(&self.store).await?;
        for record in records {
            Self::write(&mut store, record);
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let store = Self::acquire_lock(&self.store).await?;
        Ok(store.len())
    }
}
