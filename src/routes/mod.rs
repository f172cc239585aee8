use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod catalog;
pub mod me;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            // Request id first so the trace span can see it
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Catalog
        .route("/catalog/trending", get(catalog::trending))
        .route("/catalog/popular/:content_type", get(catalog::popular))
        .route("/catalog/anime", get(catalog::anime))
        .route("/catalog/genres", get(catalog::genres))
        .route("/catalog/search", get(catalog::search))
        // Signed-in user
        .route("/me/recommendations", get(me::recommendations))
        .route("/me/profile", get(me::profile))
        .route("/me/preferences", put(me::set_preferences))
        .route("/me/watchlist", get(me::watchlist))
        .route("/me/watchlist/toggle", post(me::toggle_watchlist))
        .route("/me/watchlist/:entry_id", delete(me::remove_from_watchlist))
        .route("/me/history", get(me::history).post(me::record_watched))
        .route("/me/ratings", get(me::ratings).post(me::rate))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
