//! # Repository Module
//!
//! Data persistence layer for tracked transactions.

mod redis_base;

mod transaction;
pub use transaction::*;
