mod request;
pub use request::*;

mod response;
pub use response::*;

mod repository;
pub use repository::*;
