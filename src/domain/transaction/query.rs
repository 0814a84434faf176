//! Read side: single-record status and per-sender history.
use std::sync::Arc;

use log::debug;

use crate::{
    models::{HistoryFilter, RecordKey, TransactionError, TransactionResponse},
    repositories::TransactionRepository,
};

pub struct TransactionQuery<TR>
where
    TR: TransactionRepository + Send + Sync + 'static,
{
    repository: Arc<TR>,
}

impl<TR> TransactionQuery<TR>
where
    TR: TransactionRepository + Send + Sync + 'static,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }

    pub async fn find_status(
        &self,
        key: &RecordKey,
    ) -> Result<Option<TransactionResponse>, TransactionError> {
        let record = self.repository.find_by_key(key).await?;
        if record.is_none() {
            debug!("No record for {}", key);
        }
        Ok(record.map(TransactionResponse::from))
    }

    /// Records sent by `filter.from`, newest first.
    pub async fn find_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionResponse>, TransactionError> {
        let records = self.repository.find_history(filter).await?;
        Ok(records.into_iter().map(TransactionResponse::from).collect())
    }
}
