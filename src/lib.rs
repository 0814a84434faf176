//! Transaction Lineage Tracking Service Library
//!
//! Registers blockchain transaction hashes with an external notifier, applies
//! the notifier's webhook events and keeps speedup/cancel replacement chains
//! consistent so clients can always resolve the live hash. It includes:
//!
//! - Environment-driven configuration
//! - Watch registration against the notifier API
//! - The lineage engine that links superseded and replacement hashes
//! - Status and history queries over in-memory or Redis storage
//!
//! # Module Structure
//!
//! - `api`: HTTP routes and controllers
//! - `bootstrap`: Application state construction
//! - `config`: Configuration management
//! - `domain`: Registration, lineage and query workflows
//! - `logging`: Logging setup
//! - `metrics`: Prometheus registry and request middleware
//! - `models`: Records, requests, responses and errors
//! - `repositories`: Transaction storage
//! - `services`: Notifier client
//! - `utils`: Common utilities and helper functions

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod utils;
