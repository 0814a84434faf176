//! Application state initialization
//!
//! Builds the storage backend selected by the server configuration, the
//! notifier client and the shared lineage guard.
use crate::{
    config::{RepositoryStorageType, ServerConfig},
    models::{AppState, DefaultAppState},
    repositories::TransactionRepositoryStorage,
    services::NotifierClient,
    utils::initialize_redis_connection,
};
use actix_web::web;
use color_eyre::Result;
use eyre::WrapErr;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Initializes the transaction repository based on the server configuration
///
/// # Errors
///
/// Returns error if the Redis connection cannot be established in time.
pub async fn initialize_repository(
    config: &ServerConfig,
) -> Result<Arc<TransactionRepositoryStorage>> {
    let repository = match config.repository_storage_type {
        RepositoryStorageType::InMemory => TransactionRepositoryStorage::new_in_memory(),
        RepositoryStorageType::Redis => {
            let connection_manager = initialize_redis_connection(config).await?;
            TransactionRepositoryStorage::new_redis(
                connection_manager,
                config.redis_key_prefix.clone(),
            )
            .wrap_err("Failed to create Redis transaction repository")?
        }
    };
    info!(
        "Using {} transaction storage",
        config.repository_storage_type
    );

    Ok(Arc::new(repository))
}

/// Initializes application state
///
/// # Returns
///
/// * `Result<web::ThinData<DefaultAppState>>` - Initialized application state
pub async fn initialize_app_state(
    server_config: Arc<ServerConfig>,
) -> Result<web::ThinData<DefaultAppState>> {
    let transaction_repository = initialize_repository(&server_config).await?;
    let notifier_client = Arc::new(NotifierClient::new(
        &server_config.notifier_url,
        server_config.notifier_api_key.clone(),
    ));

    let app_state = web::ThinData(AppState {
        transaction_repository,
        notifier_client,
        lineage_guard: Arc::new(Mutex::new(())),
        app_mode: server_config.app_mode,
        webhook_secret: Arc::new(server_config.webhook_secret.clone()),
    });

    Ok(app_state)
}
