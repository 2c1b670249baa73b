//! Route modules for the OCR server

pub mod health;
pub mod ocr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_file_size = state.config().upload.max_file_size;

    Router::new()
        .merge(health::router())
        .merge(ocr::router(max_file_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
