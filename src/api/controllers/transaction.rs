//! # Transaction Controller
//!
//! Handles HTTP endpoints for watched transactions:
//! - Registering a hash with the notifier
//! - Applying notifier webhook events
//! - Looking up the status of one transaction
//! - Listing a sender's history
use std::collections::HashMap;

use actix_web::HttpResponse;
use log::warn;
use serde_json::json;

use crate::{
    domain::{LineageEngine, TransactionQuery, WatchRegistrar},
    models::{
        ApiError, HistoryFilter, StatusQuery, ThinDataAppState, TransactionEventRequest,
        WatchTransactionRequest,
    },
    repositories::TransactionRepository,
    services::NotifierClientTrait,
};

/// Registers a transaction hash for monitoring.
///
/// # Arguments
///
/// * `request` - The watch request body.
/// * `state` - The application state containing the repository and notifier client.
///
/// # Returns
///
/// An empty 200 response once the notifier accepted the hash and the record is stored.
pub async fn watch_transaction<TR, NC>(
    request: WatchTransactionRequest,
    state: ThinDataAppState<TR, NC>,
) -> Result<HttpResponse, ApiError>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    let watch = request.into_command(state.app_mode)?;

    let registrar = WatchRegistrar::new(
        state.transaction_repository(),
        state.notifier_client(),
        state.lineage_guard.clone(),
    );
    registrar.register(watch).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Applies a status event posted by the notifier.
///
/// The body must carry the configured webhook secret in `apiKey`.
pub async fn update_transaction<TR, NC>(
    request: TransactionEventRequest,
    state: ThinDataAppState<TR, NC>,
) -> Result<HttpResponse, ApiError>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    if !request.is_authorized(&state.webhook_secret) {
        warn!("Rejected webhook event for {} with invalid apiKey", request.hash);
        return Err(ApiError::Unauthorized("Invalid webhook secret".to_string()));
    }

    let event = request.into_command(state.app_mode)?;
    let engine = LineageEngine::new(state.transaction_repository(), state.lineage_guard.clone());
    engine.apply(event).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Returns the stored record for `(hash, network)`, or `{}` when it is not tracked.
pub async fn get_transaction_status<TR, NC>(
    query: StatusQuery,
    state: ThinDataAppState<TR, NC>,
) -> Result<HttpResponse, ApiError>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    let key = query.into_key(state.app_mode)?;
    let transactions = TransactionQuery::new(state.transaction_repository());

    match transactions.find_status(&key).await? {
        Some(transaction) => Ok(HttpResponse::Ok().json(transaction)),
        None => Ok(HttpResponse::Ok().json(json!({}))),
    }
}

/// Lists transactions sent by `from`, newest first.
pub async fn get_transaction_history<TR, NC>(
    params: HashMap<String, String>,
    state: ThinDataAppState<TR, NC>,
) -> Result<HttpResponse, ApiError>
where
    TR: TransactionRepository + Send + Sync + 'static,
    NC: NotifierClientTrait + Send + Sync + 'static,
{
    let filter = HistoryFilter::from_query(params)?;
    let transactions = TransactionQuery::new(state.transaction_repository());

    let history = transactions.find_history(&filter).await?;

    Ok(HttpResponse::Ok().json(history))
}
