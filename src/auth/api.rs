//! Authentication API Endpoints
//! Mission: Exchange admin credentials for a bearer token

use crate::{
    api::{run_blocking, JsonDocument},
    auth::{
        credentials::CredentialProvider,
        jwt::JwtHandler,
        models::{AuthError, CredentialCheck, LoginRequest, LoginResponse},
    },
    error::ApiError,
};
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<dyn CredentialProvider>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(credentials: Arc<dyn CredentialProvider>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            credentials,
            jwt_handler,
        }
    }
}

/// Login endpoint - POST /api/login
pub async fn login(
    State(state): State<AuthState>,
    JsonDocument(doc): JsonDocument,
) -> Result<Json<LoginResponse>, ApiError> {
    let payload = LoginRequest::from_document(&doc);
    info!("🔐 Login attempt: {}", payload.username);

    let credentials = Arc::clone(&state.credentials);
    let (check, payload) = run_blocking(move || {
        let check = credentials.verify(&payload.username, &payload.password);
        (check, payload)
    })
    .await?;

    match check {
        CredentialCheck::Valid => {}
        CredentialCheck::UnknownUsername => {
            warn!("❌ Failed login attempt (unknown user): {}", payload.username);
            return Err(AuthError::InvalidUsername.into());
        }
        CredentialCheck::WrongPassword => {
            warn!("❌ Failed login attempt (bad password): {}", payload.username);
            return Err(AuthError::InvalidPassword.into());
        }
    }

    let (token, expires_in) = state
        .jwt_handler
        .generate_token(&payload.username)
        .map_err(ApiError::Internal)?;

    info!("✅ Login successful: {}", payload.username);

    Ok(Json(LoginResponse { token, expires_in }))
}
