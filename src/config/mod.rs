//! Configuration system for the service.
//!
//! All settings come from environment variables, optionally seeded from a
//! `.env` file at startup.
mod server_config;
pub use server_config::*;

mod error;
pub use error::*;
