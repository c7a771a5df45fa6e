use axum::{extract::DefaultBodyLimit, routing::{get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;
use crate::state::AppState;

pub mod images;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn method_not_supported() -> ApiError {
    ApiError::method_not_allowed()
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let image_limit = DefaultBodyLimit::max(state.image_body_limit);
    Router::new()
        .route("/health", get(health))
        .route("/user", post(users::handle_user_request).fallback(method_not_supported))
        .route(
            "/image",
            post(images::handle_image_request)
                .layer(image_limit)
                .fallback(method_not_supported),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
