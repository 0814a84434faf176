//! Redis-backed implementation of the TransactionRepository.
//!
//! Layout under `{prefix}`:
//! - `tx:{network}:{hash}` JSON document
//! - `old_hash:{network}:{hash}` / `new_hash:{network}:{hash}` sets of record hashes
//! - `from:{address}` sorted set of `{network}:{hash}` scored by timestamp
//! - `tx_list` set of every `{network}:{hash}`

use crate::models::{
    HistoryFilter, HistoryPage, Network, RecordKey, RepositoryError, TransactionRecord,
    TransactionRecordUpdate,
};
use crate::repositories::redis_base::RedisRepository;
use crate::repositories::{page_history, prepare_write, TransactionRepository};
use async_trait::async_trait;
use log::{debug, error, warn};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const TX_PREFIX: &str = "tx";
const OLD_HASH_PREFIX: &str = "old_hash";
const NEW_HASH_PREFIX: &str = "new_hash";
const FROM_PREFIX: &str = "from";
const TX_LIST_KEY: &str = "tx_list";

/// Inclusive `ZREVRANGE` ranks for a history page, or `None` when the page
/// starts beyond any rank Redis can address.
fn rank_window(page: &HistoryPage) -> Option<(isize, isize)> {
    let start = isize::try_from(page.skip).ok()?;
    let count = isize::try_from(page.count).ok()?;
    Some((start, start.saturating_add(count.saturating_sub(1))))
}

#[derive(Clone)]
pub struct RedisTransactionRepository {
    pub client: Arc<ConnectionManager>,
    pub key_prefix: String,
}

impl RedisRepository for RedisTransactionRepository {}

impl RedisTransactionRepository {
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        key_prefix: String,
    ) -> Result<Self, RepositoryError> {
        if key_prefix.is_empty() {
            return Err(RepositoryError::InvalidData(
                "Redis key prefix cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            client: connection_manager,
            key_prefix,
        })
    }

    /// Generate key for record data: tx:{network}:{hash}
    fn tx_key(&self, key: &RecordKey) -> String {
        format!("{}:{}:{}", self.key_prefix, TX_PREFIX, key)
    }

    /// Generate key for the oldHash index: old_hash:{network}:{hash}
    fn old_hash_key(&self, network: Network, old_hash: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            self.key_prefix, OLD_HASH_PREFIX, network, old_hash
        )
    }

    /// Generate key for the newHash index: new_hash:{network}:{hash}
    fn new_hash_key(&self, network: Network, new_hash: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            self.key_prefix, NEW_HASH_PREFIX, network, new_hash
        )
    }

    /// Generate key for the per-sender history: from:{address}
    fn from_key(&self, from: &str) -> String {
        format!("{}:{}:{}", self.key_prefix, FROM_PREFIX, from)
    }

    fn tx_list_key(&self) -> String {
        format!("{}:{}", self.key_prefix, TX_LIST_KEY)
    }

    /// Batch fetch records; keys with no stored document are skipped.
    async fn get_records_by_keys(
        &self,
        keys: &[RecordKey],
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        Ok(self
            .fetch_slots(keys)
            .await?
            .into_iter()
            .flatten()
            .collect())
    }

    /// One slot per requested key, in request order.
    async fn fetch_slots(
        &self,
        keys: &[RecordKey],
    ) -> Result<Vec<Option<TransactionRecord>>, RepositoryError> {
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.client.as_ref().clone();
        let tx_keys: Vec<String> = keys.iter().map(|k| self.tx_key(k)).collect();

        debug!("Batch fetching {} transaction records", tx_keys.len());

        // MGET is issued explicitly so a single key still yields a list reply
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&tx_keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| self.map_redis_error(e, "batch_fetch_transactions"))?;

        let mut records = Vec::with_capacity(values.len());
        for (key, value) in keys.iter().zip(values) {
            match value {
                Some(json) => {
                    let record: TransactionRecord = self.decode(&json, &key.to_string())?;
                    records.push(Some(record));
                }
                None => records.push(None),
            }
        }
        Ok(records)
    }

    /// Resolve members of a hash index set into records on `network`.
    async fn find_by_index(
        &self,
        index_key: &str,
        network: Network,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let mut conn = self.client.as_ref().clone();
        let hashes: Vec<String> = conn
            .smembers(index_key)
            .await
            .map_err(|e| self.map_redis_error(e, "find_by_index"))?;

        let keys: Vec<RecordKey> = hashes
            .iter()
            .map(|hash| RecordKey::new(hash, network))
            .collect();
        self.get_records_by_keys(&keys).await
    }

    fn parse_members(&self, members: Vec<String>) -> Vec<RecordKey> {
        members
            .into_iter()
            .filter_map(|member| match member.parse::<RecordKey>() {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!("Skipping malformed history member {}: {}", member, e);
                    None
                }
            })
            .collect()
    }

    /// Writes records and keeps every index in step, all in one MULTI/EXEC.
    async fn write_batch(
        &self,
        records: Vec<TransactionRecord>,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        if records.is_empty() {
            return Ok(vec![]);
        }

        let keys: Vec<RecordKey> = records.iter().map(|r| r.key()).collect();
        let existing: HashMap<RecordKey, TransactionRecord> = self
            .get_records_by_keys(&keys)
            .await?
            .into_iter()
            .map(|r| (r.key(), r))
            .collect();

        let mut conn = self.client.as_ref().clone();
        let mut pipe = redis::pipe();
        pipe.atomic();

        let mut written = Vec::with_capacity(records.len());
        for record in records {
            let key = record.key();
            let old = existing.get(&key);
            let record = prepare_write(old, record);
            let member = key.to_string();
            let value = self.encode(&record, &member)?;

            pipe.set(self.tx_key(&key), value);
            pipe.sadd(self.tx_list_key(), &member);

            let old_old_hash = old.and_then(|o| o.old_hash.as_deref());
            if old_old_hash != record.old_hash.as_deref() {
                if let Some(previous) = old_old_hash {
                    pipe.srem(self.old_hash_key(key.network, previous), &key.hash);
                }
            }
            if let Some(old_hash) = &record.old_hash {
                pipe.sadd(self.old_hash_key(key.network, old_hash), &key.hash);
            }

            let old_new_hash = old.and_then(|o| o.new_hash.as_deref());
            if old_new_hash != record.new_hash.as_deref() {
                if let Some(previous) = old_new_hash {
                    pipe.srem(self.new_hash_key(key.network, previous), &key.hash);
                }
            }
            if let Some(new_hash) = &record.new_hash {
                pipe.sadd(self.new_hash_key(key.network, new_hash), &key.hash);
            }

            let old_from = old.and_then(|o| o.from.as_deref());
            if old_from != record.from.as_deref() {
                if let Some(previous) = old_from {
                    pipe.zrem(self.from_key(previous), &member);
                }
            }
            if let Some(from) = &record.from {
                pipe.zadd(self.from_key(from), &member, record.timestamp);
            }

            written.push(record);
        }

        pipe.exec_async(&mut conn).await.map_err(|e| {
            error!("Batch write of {} records failed: {}", written.len(), e);
            self.map_redis_error(e, "write_batch")
        })?;

        debug!("Committed batch of {} records", written.len());
        Ok(written)
    }
}

impl fmt::Debug for RedisTransactionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisTransactionRepository")
            .field("client", &"<ConnectionManager>")
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

#[async_trait]
impl TransactionRepository for RedisTransactionRepository {
    async fn find_by_key(
        &self,
        key: &RecordKey,
    ) -> Result<Option<TransactionRecord>, RepositoryError> {
        let mut conn = self.client.as_ref().clone();
        let value: Option<String> = conn
            .get(self.tx_key(key))
            .await
            .map_err(|e| self.map_redis_error(e, "find_by_key"))?;

        value
            .map(|json| self.decode(&json, &key.to_string()))
            .transpose()
    }

    async fn find_by_old_hash(
        &self,
        network: Network,
        old_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let index_key = self.old_hash_key(network, old_hash);
        self.find_by_index(&index_key, network).await
    }

    async fn find_by_new_hash(
        &self,
        network: Network,
        new_hash: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let index_key = self.new_hash_key(network, new_hash);
        self.find_by_index(&index_key, network).await
    }

    async fn find_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        if filter.page.count == 0 {
            return Ok(vec![]);
        }

        let mut conn = self.client.as_ref().clone();
        let from_key = self.from_key(&filter.from);

        // Without field filters the sorted set already holds the page.
        let (start, stop) = if filter.filters.is_empty() {
            match rank_window(&filter.page) {
                Some(window) => window,
                None => return Ok(vec![]),
            }
        } else {
            (0, -1)
        };

        let members: Vec<String> = conn
            .zrevrange(&from_key, start, stop)
            .await
            .map_err(|e| self.map_redis_error(e, "find_history"))?;

        let records = self
            .get_records_by_keys(&self.parse_members(members))
            .await?;

        if filter.filters.is_empty() {
            let mut unpaged = filter.clone();
            unpaged.page.skip = 0;
            return Ok(page_history(records, &unpaged));
        }
        Ok(page_history(records, filter))
    }

    async fn upsert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError> {
        self.write_batch(vec![record])
            .await?
            .pop()
            .ok_or_else(|| RepositoryError::Unknown("Upsert produced no record".to_string()))
    }

    async fn partial_update(
        &self,
        key: &RecordKey,
        update: TransactionRecordUpdate,
    ) -> Result<Option<TransactionRecord>, RepositoryError> {
        let Some(mut record) = self.find_by_key(key).await? else {
            return Ok(None);
        };
        record.apply_partial_update(update);
        Ok(self.write_batch(vec![record]).await?.pop())
    }

    async fn save_all(&self, records: Vec<TransactionRecord>) -> Result<(), RepositoryError> {
        self.write_batch(records).await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let mut conn = self.client.as_ref().clone();
        let count: u64 = conn
            .scard(self.tx_list_key())
            .await
            .map_err(|e| self.map_redis_error(e, "count"))?;
        Ok(count as usize)
    }
}
