//! # Watchgod
//!
//! Tracks blockchain transactions registered for monitoring and the chains of
//! speedup/cancel replacements reported by the notifier.
//!
//! ## Architecture
//!
//! The service is built using Actix-web and provides:
//! - `POST /watch` and `POST /update` for registration and notifier events
//! - `GET /status` and `GET /history` for lookups
//! - An optional Prometheus listener on a separate port
//!
//! ## Usage
//!
//! ```bash
//! cargo run
//! ```

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{
    dev::Service,
    middleware::{self, Logger},
    web, App, HttpResponse, HttpServer,
};
use color_eyre::{eyre::WrapErr, Result};
use dotenvy::dotenv;
use log::info;
use utoipa::OpenApi;

use watchgod::{
    api,
    bootstrap::initialize_app_state,
    config::ServerConfig,
    logging::setup_logging,
    metrics::middleware::MetricsMiddleware,
    models::ApiResponse,
    openapi::ApiDoc,
    utils::{check_authorization_header, cors_policy, is_public_endpoint},
};

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize error reporting with eyre
    color_eyre::install().wrap_err("Failed to initialize error reporting")?;

    dotenv().ok();
    setup_logging().wrap_err("Failed to initialize logging")?;

    let config = Arc::new(ServerConfig::from_env().wrap_err("Invalid server configuration")?);
    info!("Running in {} mode", config.app_mode);

    let app_state = initialize_app_state(config.clone()).await?;

    // Rate limit configuration
    let rate_limit_config = GovernorConfigBuilder::default()
        .requests_per_second(config.rate_limit_requests_per_second)
        .burst_size(config.rate_limit_burst_size)
        .finish()
        .ok_or_else(|| eyre::eyre!("Invalid rate limit configuration"))?;

    let moved_cfg = Arc::clone(&config);
    info!("Starting server on {}:{}", config.host, config.port);
    let app_server = HttpServer::new(move || {
        let config = Arc::clone(&moved_cfg);
        let enable_swagger = config.enable_swagger;
        let cors = cors_policy(&config.cors_allowed_origins);
        App::new()
            .wrap_fn(move |req, srv| {
                if is_public_endpoint(req.path()) || check_authorization_header(&req, &config.api_key)
                {
                    return srv.call(req);
                }

                Box::pin(async move {
                    Ok(req.into_response(
                        HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Unauthorized")),
                    ))
                })
            })
            .wrap(MetricsMiddleware)
            .wrap(Governor::new(&rate_limit_config))
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::DefaultHeaders::new())
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(api::routes::configure_routes)
            .configure(move |cfg| {
                if enable_swagger {
                    cfg.route("/api-docs/openapi.json", web::get().to(openapi_json));
                }
            })
    })
    .bind((config.host.as_str(), config.port))
    .wrap_err_with(|| format!("Failed to bind server to {}:{}", config.host, config.port))?
    .shutdown_timeout(5)
    .run();

    if config.metrics_enabled {
        info!("Starting metrics server on {}:{}", config.host, config.metrics_port);
        let metrics_server = HttpServer::new(|| {
            App::new()
                .wrap(Logger::default())
                .configure(api::routes::metrics::init)
        })
        .workers(2)
        .bind((config.host.as_str(), config.metrics_port))
        .wrap_err_with(|| {
            format!(
                "Failed to bind metrics server to {}:{}",
                config.host, config.metrics_port
            )
        })?
        .shutdown_timeout(5)
        .run();

        futures::try_join!(app_server, metrics_server).wrap_err("Server runtime error")?;
    } else {
        app_server.await.wrap_err("Server runtime error")?;
    }

    Ok(())
}
