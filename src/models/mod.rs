//! # Models Module
//!
//! Core data structures shared by the API, domain and storage layers.

mod network;
pub use network::*;

mod app_state;
pub use app_state::*;

mod api_response;
pub use api_response::*;

mod transaction;
pub use transaction::*;

mod error;
pub use error::*;

mod pagination;
pub use pagination::*;

mod secret_string;
pub use secret_string::*;
