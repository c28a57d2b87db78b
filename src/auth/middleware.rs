//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::{
    auth::{jwt::JwtHandler, models::AuthError},
    error::ApiError,
};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Auth middleware that validates JWT tokens
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_headers(req.headers()).ok_or(AuthError::MissingToken)?;

    // Validate token and extract claims
    let claims = jwt_handler.validate_token(token).map_err(|e| {
        debug!("Rejected token: {:#}", e);
        AuthError::InvalidToken
    })?;

    // Handlers pick these up with `Extension<Claims>`
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// The raw `authorization` header value is the token; a `Bearer ` prefix is
/// tolerated but not required.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
