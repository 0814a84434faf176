mod auth;
pub use auth::*;

mod cors;
pub use cors::*;

mod redis;
pub use self::redis::*;

mod time;
pub use time::*;
