//! Transaction workflows driven by the HTTP layer.
//!
//! Every write into the lineage graph (registrations and webhook events) runs
//! while holding the shared lineage guard, so a replacement never observes a
//! half-applied neighbour.

mod lineage;
mod query;
mod registration;

pub use lineage::*;
pub use query::*;
pub use registration::*;
