//! OpenAPI path descriptions for the transaction endpoints.
use crate::models::{
    ApiResponse, StatusQuery, TransactionEventRequest, TransactionResponse,
    WatchTransactionRequest,
};

/// Registers a transaction hash with the notifier and records it as `watched`.
#[utoipa::path(
    post,
    path = "/watch",
    tag = "Transactions",
    operation_id = "watchTransaction",
    security(
        ("bearer_auth" = [])
    ),
    request_body = WatchTransactionRequest,
    responses(
        (status = 200, description = "Transaction is being watched"),
        (
            status = 400,
            description = "Invalid request or notifier refused the hash",
            body = ApiResponse<String>,
            example = json!({
                "success": false,
                "data": null,
                "error": "hash: must be 0x followed by 64 hex characters"
            })
        ),
        (
            status = 401,
            description = "Unauthorized",
            body = ApiResponse<String>,
            example = json!({
                "success": false,
                "data": null,
                "error": "Unauthorized"
            })
        ),
        (status = 429, description = "Too Many Requests", body = String),
    )
)]
#[allow(dead_code)]
fn doc_watch_transaction() {}

/// Webhook called by the notifier when a watched transaction changes state.
///
/// A `replaceHash` marks a speedup or cancel: the reported hash is superseded
/// and the chain is re-pointed at the newest hash.
#[utoipa::path(
    post,
    path = "/update",
    tag = "Transactions",
    operation_id = "updateTransaction",
    request_body = TransactionEventRequest,
    responses(
        (status = 200, description = "Event applied, or ignored for an untracked hash"),
        (
            status = 400,
            description = "Invalid event, lineage cycle or storage failure",
            body = ApiResponse<String>,
            example = json!({
                "success": false,
                "data": null,
                "error": "Failed to persist transaction"
            })
        ),
        (
            status = 401,
            description = "Webhook secret missing or wrong",
            body = ApiResponse<String>,
            example = json!({
                "success": false,
                "data": null,
                "error": "Invalid webhook secret"
            })
        ),
    )
)]
#[allow(dead_code)]
fn doc_update_transaction() {}

/// Current record of one transaction; `{}` when the hash is not tracked.
#[utoipa::path(
    get,
    path = "/status",
    tag = "Transactions",
    operation_id = "getTransactionStatus",
    security(
        ("bearer_auth" = [])
    ),
    params(StatusQuery),
    responses(
        (status = 200, description = "Transaction record or empty object", body = TransactionResponse),
        (status = 400, description = "Invalid hash or network", body = ApiResponse<String>),
        (status = 401, description = "Unauthorized", body = ApiResponse<String>),
    )
)]
#[allow(dead_code)]
fn doc_get_transaction_status() {}

/// Transactions sent by an address, newest first.
///
/// Any other query parameter is an equality filter on a record field.
#[utoipa::path(
    get,
    path = "/history",
    tag = "Transactions",
    operation_id = "getTransactionHistory",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("from" = String, Query, description = "Sender address"),
        ("count" = Option<usize>, Query, description = "Page size (default: 10, at most 20)"),
        ("skip" = Option<usize>, Query, description = "Records to skip (default: 0)"),
        ("status" = Option<String>, Query, description = "Example field filter"),
    ),
    responses(
        (status = 200, description = "Matching transactions", body = Vec<TransactionResponse>),
        (status = 400, description = "Missing sender or unknown filter field", body = ApiResponse<String>),
        (status = 401, description = "Unauthorized", body = ApiResponse<String>),
    )
)]
#[allow(dead_code)]
fn doc_get_transaction_history() {}
