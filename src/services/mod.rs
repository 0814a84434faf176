//! # Services Module
//!
//! Clients for systems outside this service.

mod notifier;
pub use notifier::*;
