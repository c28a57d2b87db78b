//! Authentication Module
//! Mission: Secure API access with a single admin credential and JWT tokens

pub mod api;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use api::AuthState;
pub use credentials::{CredentialProvider, StaticCredentials};
pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use models::Claims;
