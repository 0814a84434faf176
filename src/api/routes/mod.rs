//! # API Routes Module
//!
//! Configures HTTP routes for the watch service API.
//!
//! ## Routes
//!
//! * `/health` - Health check endpoints
//! * `/watch`, `/update`, `/status`, `/history` - Transaction endpoints
//!
//! Metrics routes are served by a separate listener, see [`metrics`].

pub mod docs;
pub mod health;
pub mod metrics;
pub mod transaction;

use actix_web::{error, web};

use crate::models::ApiError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(ApiError::BadRequest(format!("Invalid JSON body: {}", err)))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(ApiError::BadRequest(format!("Invalid query: {}", err)))
    }))
    .configure(health::init)
    .configure(transaction::init);
}
