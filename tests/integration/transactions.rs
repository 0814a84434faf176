//! End-to-end flows through the transaction routes, backed by in-memory
//! storage and a mocked notifier.
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use watchgod::{
    api::routes::configure_routes,
    models::{AppMode, AppState, DefaultAppState, Network, RecordKey, SecretString, TransactionRecord},
    repositories::{TransactionRepository, TransactionRepositoryStorage},
    services::NotifierClient,
};

const NOTIFIER_KEY: &str = "notifier-key";
const WEBHOOK_SECRET: &str = "webhook-secret";
const SENDER: &str = "0x00000000000000000000000000000000000000aa";
const H1: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
const H2: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
const H3: &str = "0x3333333333333333333333333333333333333333333333333333333333333333";
const AAA: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const BBB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

fn create_app_state(notifier_url: &str) -> DefaultAppState {
    AppState {
        transaction_repository: Arc::new(TransactionRepositoryStorage::new_in_memory()),
        notifier_client: Arc::new(NotifierClient::new(
            notifier_url,
            SecretString::new(NOTIFIER_KEY),
        )),
        lineage_guard: Arc::new(Mutex::new(())),
        app_mode: AppMode::Mainnet,
        webhook_secret: Arc::new(SecretString::new(WEBHOOK_SECRET)),
    }
}

macro_rules! watchgod_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::ThinData($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn mount_notifier(server: &MockServer, hash: &str, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path("/transaction"))
        .and(body_partial_json(json!({
            "apiKey": NOTIFIER_KEY,
            "hash": hash,
            "blockchain": "ethereum",
            "network": "main",
        })))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

async fn seed(state: &DefaultAppState, hash: &str, timestamp: i64) {
    let mut record = TransactionRecord::new(&RecordKey::new(hash, Network::Main), "watched", timestamp);
    record.from = Some(SENDER.to_string());
    state.transaction_repository.upsert(record).await.unwrap();
}

async fn stored(state: &DefaultAppState, hash: &str) -> TransactionRecord {
    state
        .transaction_repository
        .find_by_key(&RecordKey::new(hash, Network::Main))
        .await
        .unwrap()
        .unwrap()
}

fn replacement(hash: &str, replace_hash: &str) -> Value {
    json!({
        "apiKey": WEBHOOK_SECRET,
        "hash": hash,
        "network": "main",
        "status": "speedup",
        "replaceHash": replace_hash,
    })
}

#[actix_web::test]
async fn test_watch_then_status_reports_watched() {
    let server = MockServer::start().await;
    mount_notifier(&server, H1, 200, 2).await;
    let state = create_app_state(&server.uri());
    let app = watchgod_app!(state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/watch")
            .set_json(json!({"hash": H1, "network": "main", "txType": "burn"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/status?hash={}&network=main", H1))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["hash"], H1);
    assert_eq!(body["status"], "watched");
    assert_eq!(body["txType"], "burn");
    assert!(body.get("id").is_none());
    assert_eq!(state.transaction_repository.count().await.unwrap(), 1);
}

#[actix_web::test]
async fn test_watch_rejected_by_notifier_stores_nothing() {
    let server = MockServer::start().await;
    mount_notifier(&server, H1, 500, 1).await;
    let state = create_app_state(&server.uri());
    let app = watchgod_app!(state);

    let req = test::TestRequest::post()
        .uri("/watch")
        .set_json(json!({"hash": H1, "network": "main"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to register transaction with notifier");
    assert_eq!(state.transaction_repository.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_watch_with_invalid_hash_never_reaches_notifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let state = create_app_state(&server.uri());
    let app = watchgod_app!(state);

    let req = test::TestRequest::post()
        .uri("/watch")
        .set_json(json!({"hash": "0x1234", "network": "goerli"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("hash:"));
    assert!(message.contains("network:"));
}

#[actix_web::test]
async fn test_status_of_unknown_hash_is_empty_object() {
    let state = create_app_state("http://127.0.0.1:1");
    let app = watchgod_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/status?hash={}&network=main", H2))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({}));
}

#[actix_web::test]
async fn test_update_for_untracked_hash_is_accepted_and_ignored() {
    let state = create_app_state("http://127.0.0.1:1");
    let app = watchgod_app!(state);

    let req = test::TestRequest::post()
        .uri("/update")
        .set_json(json!({
            "apiKey": WEBHOOK_SECRET,
            "hash": H1,
            "network": "main",
            "status": "confirmed",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.transaction_repository.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_update_with_wrong_secret_is_unauthorized() {
    let state = create_app_state("http://127.0.0.1:1");
    seed(&state, H1, 1).await;
    let app = watchgod_app!(state);

    let mut body = replacement(H1, H2);
    body["apiKey"] = json!("not-the-secret");
    let req = test::TestRequest::post().uri("/update").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(stored(&state, H1).await.status, "watched");
    assert_eq!(state.transaction_repository.count().await.unwrap(), 1);
}

#[actix_web::test]
async fn test_speedup_links_original_and_replacement() {
    let state = create_app_state("http://127.0.0.1:1");
    seed(&state, AAA, 1).await;
    let app = watchgod_app!(state);

    let mut event = replacement(AAA, BBB);
    event["from"] = json!(SENDER);
    let req = test::TestRequest::post()
        .uri("/update")
        .set_json(event)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let original = stored(&state, AAA).await;
    assert_eq!(original.status, "speedup");
    assert_eq!(original.new_hash.as_deref(), Some(BBB));

    let req = test::TestRequest::get()
        .uri(&format!("/status?hash={}&network=main", BBB))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["oldHash"], AAA);
    assert_eq!(body["from"], SENDER);
    assert!(body.get("newHash").is_none());
    assert_eq!(state.transaction_repository.count().await.unwrap(), 2);
}

#[actix_web::test]
async fn test_replacement_chain_converges_in_either_order() {
    for events in [[(H1, H2), (H2, H3)], [(H2, H3), (H1, H2)]] {
        let state = create_app_state("http://127.0.0.1:1");
        seed(&state, H1, 1).await;
        let app = watchgod_app!(state);

        for (hash, replace_hash) in events {
            let req = test::TestRequest::post()
                .uri("/update")
                .set_json(replacement(hash, replace_hash))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        assert_eq!(stored(&state, H1).await.new_hash.as_deref(), Some(H3));
        assert_eq!(stored(&state, H2).await.new_hash.as_deref(), Some(H3));
        assert_eq!(stored(&state, H2).await.old_hash.as_deref(), Some(H1));
        let head = stored(&state, H3).await;
        assert_eq!(head.old_hash.as_deref(), Some(H2));
        assert!(head.is_head());
    }
}

#[actix_web::test]
async fn test_replacement_cycle_is_rejected() {
    let state = create_app_state("http://127.0.0.1:1");
    seed(&state, H1, 1).await;
    let app = watchgod_app!(state);

    let req = test::TestRequest::post()
        .uri("/update")
        .set_json(replacement(H1, H1))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(stored(&state, H1).await.is_head());
}

#[actix_web::test]
async fn test_history_pages_are_clamped() {
    let state = create_app_state("http://127.0.0.1:1");
    for i in 1..=25u8 {
        let hash = format!("0x{:064x}", i);
        seed(&state, &hash, i64::from(i)).await;
    }
    let app = watchgod_app!(state);

    let history = |query: String| test::TestRequest::get().uri(&format!("/history?{}", query));

    let body: Vec<Value> =
        test::call_and_read_body_json(&app, history(format!("from={}", SENDER)).to_request())
            .await;
    assert_eq!(body.len(), 10);
    assert_eq!(body[0]["timestamp"], 25);
    assert_eq!(body[9]["timestamp"], 16);

    let body: Vec<Value> = test::call_and_read_body_json(
        &app,
        history(format!("from={}&count=1000", SENDER)).to_request(),
    )
    .await;
    assert_eq!(body.len(), 20);

    let body: Vec<Value> = test::call_and_read_body_json(
        &app,
        history(format!("from={}&count=20&skip=20", SENDER)).to_request(),
    )
    .await;
    assert_eq!(body.len(), 5);
    assert_eq!(body[4]["timestamp"], 1);
}

#[actix_web::test]
async fn test_history_filters_and_rejects_unknown_fields() {
    let state = create_app_state("http://127.0.0.1:1");
    seed(&state, H1, 1).await;
    seed(&state, H2, 2).await;
    let app = watchgod_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/history?from={}&hash={}", SENDER.to_uppercase().replace("0X", "0x"), H1))
        .to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["hash"], H1);

    let req = test::TestRequest::get()
        .uri(&format!("/history?from={}&gasPrice=1", SENDER))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/history").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
