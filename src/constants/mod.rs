//! This module contains all the constant values used in the system
mod authorization;
pub use authorization::*;

mod transaction;
pub use transaction::*;

mod validation;
pub use validation::*;

mod public_endpoints;
pub use public_endpoints::*;
