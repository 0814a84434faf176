//! Initialization routines for the service
//!
//! # Submodules
//!
//! - `initialize_app_state`: Builds the storage backend, notifier client and shared state
mod initialize_app_state;
pub use initialize_app_state::*;
