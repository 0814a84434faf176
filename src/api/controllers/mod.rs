//! # API Controllers Module
//!
//! Handles HTTP request processing and business logic coordination.
//!
//! ## Controllers
//!
//! * `transaction` - Watch registration, webhook events and transaction lookups

pub mod transaction;
