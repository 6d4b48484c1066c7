pub mod auth;
pub mod extract;
pub mod response;

pub use auth::authenticate_jwt;
pub use extract::{JsonBody, QueryParams};
pub use response::{ApiResponse, ApiResult};
