//! This module defines the HTTP routes for watched transactions.
//! Client routes (`/watch`, `/status`, `/history`) sit behind the bearer token;
//! `/update` is the notifier webhook and authenticates through its body.
use std::collections::HashMap;

use crate::{
    api::controllers::transaction,
    models::{DefaultAppState, StatusQuery, TransactionEventRequest, WatchTransactionRequest},
};
use actix_web::{get, post, web, Responder};

/// Registers a transaction hash with the notifier and starts tracking it.
#[post("/watch")]
async fn watch_transaction(
    body: web::Json<WatchTransactionRequest>,
    data: web::ThinData<DefaultAppState>,
) -> impl Responder {
    transaction::watch_transaction(body.into_inner(), data).await
}

/// Notifier callback carrying a status change, possibly with a replacement hash.
#[post("/update")]
async fn update_transaction(
    body: web::Json<TransactionEventRequest>,
    data: web::ThinData<DefaultAppState>,
) -> impl Responder {
    transaction::update_transaction(body.into_inner(), data).await
}

#[get("/status")]
async fn get_transaction_status(
    query: web::Query<StatusQuery>,
    data: web::ThinData<DefaultAppState>,
) -> impl Responder {
    transaction::get_transaction_status(query.into_inner(), data).await
}

#[get("/history")]
async fn get_transaction_history(
    query: web::Query<HashMap<String, String>>,
    data: web::ThinData<DefaultAppState>,
) -> impl Responder {
    transaction::get_transaction_history(query.into_inner(), data).await
}

/// Initializes the routes for the transaction module.
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(watch_transaction);
    cfg.service(update_transaction);
    cfg.service(get_transaction_status);
    cfg.service(get_transaction_history);
}
