//! Lenient JSON body extraction.
//!
//! A request without a JSON content type, or with an empty body, is read as
//! an empty document. Only a body that claims to be JSON and fails to parse
//! is rejected.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// The request body as a JSON object
#[derive(Debug, Clone, Default)]
pub struct JsonDocument(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonDocument
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        parse_document(is_json, &bytes).map(JsonDocument)
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn parse_document(is_json: bool, bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(_) => Err(ApiError::Validation(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(ApiError::Validation(format!(
            "Failed to parse the request body as JSON: {}",
            e
        ))),
    }
}
