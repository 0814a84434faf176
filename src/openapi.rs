use crate::{
    api::routes::{docs::transaction_docs, health, metrics},
    models,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// # OpenAPI Specification Generator
///
/// Describes the watch service API. Served at `/api-docs/openapi.json` when
/// enabled and written to disk by the `generate_openapi` helper.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
      (name = "Transactions", description = "Register transaction hashes for monitoring, receive notifier events and query the tracked records."),
      (name = "Metrics", description = "Prometheus metrics exposed on the metrics listener."),
      (name = "Health", description = "Liveness of the service.")
    ),
    info(description = "Watchgod transaction lineage API", version = "0.1.0", title = "Watchgod API", license(
        name = "AGPL-3.0 license",
    )),
    paths(
        transaction_docs::doc_watch_transaction,
        transaction_docs::doc_update_transaction,
        transaction_docs::doc_get_transaction_status,
        transaction_docs::doc_get_transaction_history,
        health::health,
        metrics::list_metrics,
        metrics::metric_detail,
        metrics::scrape_metrics,
    ),
    components(schemas(
        models::WatchTransactionRequest,
        models::TransactionEventRequest,
        models::TransactionResponse,
        models::Network,
        models::TxType,
        models::BridgeType,
    ))
)]
pub struct ApiDoc;
