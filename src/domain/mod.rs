//! # Domain Module
//!
//! Core domain logic of the service:
//!
//! * Watch registration against the notifier
//! * Lineage tracking for speedup/cancel replacements
//! * Status and history lookups

mod transaction;
pub use transaction::*;
