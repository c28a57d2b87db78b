use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{
    auth::{api as auth_api, auth_middleware, AuthState},
    middleware::request_logging,
    tenders::{api as tender_api, TenderStore},
};

/// Create the API router
pub fn create_router(auth_state: AuthState, store: Arc<TenderStore>) -> Router {
    let jwt_handler = auth_state.jwt_handler.clone();

    let auth_router = Router::new()
        .route("/api/login", post(auth_api::login))
        .with_state(auth_state);

    // Every tender route sits behind the token gate
    let protected_routes = Router::new()
        .route(
            "/api/tenders",
            post(tender_api::create_tender).get(tender_api::list_tenders),
        )
        .route("/api/tenders/search", get(tender_api::search_tenders))
        .route(
            "/api/tenders/:id",
            put(tender_api::update_tender).delete(tender_api::delete_tender),
        )
        .route_layer(middleware::from_fn_with_state(jwt_handler, auth_middleware))
        .with_state(store);

    Router::new()
        .merge(auth_router)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not found" })),
    )
}
