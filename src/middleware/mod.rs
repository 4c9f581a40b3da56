pub mod auth;
pub mod response;

pub use auth::{admin_credential_from_headers, locker_password_from_headers, ADMIN_PASSWORD_HEADER, LOCKER_PASSWORD_HEADER};
pub use response::{ApiResponse, ApiResult};
