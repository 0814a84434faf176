//! Watch registration: hand the hash to the notifier, then record it locally.
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use crate::{
    metrics::WATCH_REGISTRATIONS,
    models::{RepositoryError, TransactionError, TransactionRecord, WatchTransaction},
    repositories::TransactionRepository,
    services::NotifierClientTrait,
    utils::now_millis,
};

pub struct WatchRegistrar<TR, NC>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    repository: Arc<TR>,
    notifier: Arc<NC>,
    guard: Arc<Mutex<()>>,
}

impl<TR, NC> WatchRegistrar<TR, NC>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    pub fn new(repository: Arc<TR>, notifier: Arc<NC>, guard: Arc<Mutex<()>>) -> Self {
        Self {
            repository,
            notifier,
            guard,
        }
    }

    /// Registers `watch` with the notifier and upserts its record.
    ///
    /// Nothing is written when the notifier refuses the hash.
    pub async fn register(
        &self,
        watch: WatchTransaction,
    ) -> Result<TransactionRecord, TransactionError> {
        let network: &'static str = watch.key.network.into();

        if let Err(err) = self
            .notifier
            .watch_transaction(&watch.key.hash, watch.key.network)
            .await
        {
            warn!("Notifier refused watch for {}: {}", watch.key, err);
            WATCH_REGISTRATIONS
                .with_label_values(&[network, "failure"])
                .inc();
            return Err(err.into());
        }

        let stored = match self.persist(&watch).await {
            Ok(record) => record,
            Err(err) => {
                WATCH_REGISTRATIONS
                    .with_label_values(&[network, "failure"])
                    .inc();
                return Err(err.into());
            }
        };

        WATCH_REGISTRATIONS
            .with_label_values(&[network, "success"])
            .inc();
        info!("Watching transaction {}", watch.key);
        Ok(stored)
    }

    async fn persist(&self, watch: &WatchTransaction) -> Result<TransactionRecord, RepositoryError> {
        let _guard = self.guard.lock().await;
        let existing = self.repository.find_by_key(&watch.key).await?;
        let record = TransactionRecord::registered(existing, watch, now_millis());
        self.repository.upsert(record).await
    }
}
