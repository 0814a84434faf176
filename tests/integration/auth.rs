// integration tests for the bearer token gate wired in main.rs
use actix_web::{
    dev::Service,
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN},
        Method, StatusCode,
    },
    test, web, App, HttpResponse,
};
use std::sync::Arc;

use watchgod::{
    constants::{AUTHORIZATION_HEADER_NAME, AUTHORIZATION_HEADER_VALUE_PREFIX},
    metrics::{middleware::MetricsMiddleware, ERROR_COUNTER},
    models::{ApiResponse, SecretString},
    utils::{check_authorization_header, cors_policy, is_public_endpoint},
};

macro_rules! gated_app {
    ($api_key:expr) => {{
        let api_key = Arc::new(SecretString::new($api_key));
        test::init_service(
            App::new()
                .wrap_fn(move |req, srv| {
                    if is_public_endpoint(req.path())
                        || check_authorization_header(&req, &api_key)
                    {
                        return srv.call(req);
                    }
                    Box::pin(async move {
                        Ok(req.into_response(
                            HttpResponse::Unauthorized()
                                .json(ApiResponse::<()>::error("Unauthorized")),
                        ))
                    })
                })
                .wrap(MetricsMiddleware)
                .wrap(cors_policy(&["http://localhost:3000".to_string()]))
                .service(web::resource("/status").to(|| async { HttpResponse::Ok().body("Success") }))
                .service(web::resource("/update").to(|| async { HttpResponse::Ok().body("Webhook") })),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_authorization_gate_accepts_bearer_token() {
    let app = gated_app!("test_key");

    let req = test::TestRequest::get()
        .uri("/status")
        .insert_header((
            AUTHORIZATION_HEADER_NAME,
            format!("{}{}", AUTHORIZATION_HEADER_VALUE_PREFIX, "test_key"),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_authorization_gate_rejects_missing_or_wrong_token() {
    let app = gated_app!("test_key");

    let req = test::TestRequest::get().uri("/status").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unauthorized");

    let req = test::TestRequest::get()
        .uri("/status")
        .insert_header((AUTHORIZATION_HEADER_NAME, "Bearer wrong_key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let unauthorized = ERROR_COUNTER
        .with_label_values(&["/status", "GET", "401"])
        .get();
    assert!(unauthorized >= 2.0);
}

#[actix_web::test]
async fn test_webhook_route_skips_bearer_token() {
    let app = gated_app!("test_key");

    let req = test::TestRequest::post().uri("/update").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_cors_preflight_is_answered_before_the_token_check() {
    let app = gated_app!("test_key");

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/status")
        .insert_header((ORIGIN, "http://localhost:3000"))
        .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}

#[actix_web::test]
async fn test_cors_request_still_needs_bearer_token() {
    let app = gated_app!("test_key");

    let req = test::TestRequest::get()
        .uri("/status")
        .insert_header((ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
