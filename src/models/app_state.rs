//! Shared state handed to every request handler.
use std::sync::Arc;

use actix_web::web::ThinData;
use tokio::sync::Mutex;

use crate::{
    models::{AppMode, SecretString},
    repositories::{TransactionRepository, TransactionRepositoryStorage},
    services::{NotifierClient, NotifierClientTrait},
};

pub struct AppState<TR, NC>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    pub transaction_repository: Arc<TR>,
    pub notifier_client: Arc<NC>,
    /// Serializes lineage writes across all handlers.
    pub lineage_guard: Arc<Mutex<()>>,
    pub app_mode: AppMode,
    pub webhook_secret: Arc<SecretString>,
}

impl<TR, NC> Clone for AppState<TR, NC>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            transaction_repository: Arc::clone(&self.transaction_repository),
            notifier_client: Arc::clone(&self.notifier_client),
            lineage_guard: Arc::clone(&self.lineage_guard),
            app_mode: self.app_mode,
            webhook_secret: Arc::clone(&self.webhook_secret),
        }
    }
}

impl<TR, NC> AppState<TR, NC>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    pub fn transaction_repository(&self) -> Arc<TR> {
        Arc::clone(&self.transaction_repository)
    }

    pub fn notifier_client(&self) -> Arc<NC> {
        Arc::clone(&self.notifier_client)
    }
}

pub type DefaultAppState = AppState<TransactionRepositoryStorage, NotifierClient>;

pub type ThinDataAppState<TR, NC> = ThinData<AppState<TR, NC>>;
