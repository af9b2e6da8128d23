use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::ops::health))
        .route("/metrics", get(handlers::ops::metrics))
        // Each POST triggers one synchronous pipeline run
        .route("/sync/portfolio", post(handlers::sync::sync_portfolio))
        .route("/scan/trades", post(handlers::sync::scan_trades))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
