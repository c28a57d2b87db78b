//! Tender API Endpoints
//! Mission: CRUD and search over the tender collection (JWT protected)

use crate::{
    api::{run_blocking, JsonDocument},
    auth::Claims,
    error::ApiError,
    tenders::{
        models::{Tender, TenderFields},
        store::TenderStore,
    },
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct TenderSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create tender - POST /api/tenders
pub async fn create_tender(
    State(store): State<Arc<TenderStore>>,
    Extension(claims): Extension<Claims>,
    JsonDocument(doc): JsonDocument,
) -> Result<Json<Tender>, ApiError> {
    let fields = TenderFields::from_document(&doc)?;
    let tender = run_blocking(move || store.create(fields)).await??;

    info!("📝 Tender {} created by {}", tender.id, claims.username);
    Ok(Json(tender))
}

/// List tenders - GET /api/tenders
pub async fn list_tenders(
    State(store): State<Arc<TenderStore>>,
) -> Result<Json<Vec<Tender>>, ApiError> {
    let tenders = run_blocking(move || store.list_all()).await??;
    Ok(Json(tenders))
}

/// Search tenders by name - GET /api/tenders/search?q=
pub async fn search_tenders(
    State(store): State<Arc<TenderStore>>,
    params: Result<Query<TenderSearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Tender>>, ApiError> {
    let Query(params) = params?;
    let tenders = run_blocking(move || store.search_by_name(params.q.as_deref())).await??;
    Ok(Json(tenders))
}

/// Replace tender - PUT /api/tenders/:id
///
/// Responds with `null` when the tender does not exist.
pub async fn update_tender(
    State(store): State<Arc<TenderStore>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    JsonDocument(doc): JsonDocument,
) -> Result<Json<Option<Tender>>, ApiError> {
    let fields = TenderFields::from_document(&doc)?;
    let target = id.clone();
    let updated = run_blocking(move || store.update(&target, fields)).await??;

    if updated.is_some() {
        info!("✏️  Tender {} updated by {}", id, claims.username);
    }
    Ok(Json(updated))
}

/// Delete tender - DELETE /api/tenders/:id
pub async fn delete_tender(
    State(store): State<Arc<TenderStore>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let target = id.clone();
    run_blocking(move || store.delete(&target)).await??;

    info!("🗑️  Tender {} deleted by {}", id, claims.username);
    Ok(Json(MessageResponse {
        message: "Deleted".to_string(),
    }))
}
