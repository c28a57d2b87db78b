//! API error mapping
//!
//! Every handler failure funnels through [`ApiError`], which decides the
//! HTTP status and the JSON `{"message": ...}` body in one place.

use crate::auth::models::AuthError;
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

/// Message returned for every store failure; the cause only goes to the logs.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Validation(String),
    StoreFault(anyhow::Error),
    /// Failures outside the store, such as token signing or a panicked worker
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::InvalidUsername | AuthError::InvalidPassword) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreFault(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Auth(e) => e.to_string(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::StoreFault(_) | ApiError::Internal(_) => SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Auth(e) => write!(f, "auth error: {}", e),
            ApiError::Validation(msg) => write!(f, "validation error: {}", msg),
            ApiError::StoreFault(e) => write!(f, "store fault: {:#}", e),
            ApiError::Internal(e) => write!(f, "internal error: {:#}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::StoreFault(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::StoreFault(e) => error!("❌ Store fault: {:#}", e),
            ApiError::Internal(e) => error!("❌ Internal error: {:#}", e),
            other => debug!("Request rejected: {}", other),
        }

        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}
