// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{corpus, mock},
    state::AppState,
};

/// Assembles the main application router.
///
/// * `/api/mock`: assemble, preview and score mocks.
/// * `/api/corpus`: browse what can be requested.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    // Share links are opened from anywhere, and nothing here is credentialed.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let mock_routes = Router::new()
        .route("/", get(mock::create_mock))
        .route("/decode", get(mock::decode_mock))
        .route("/score", post(mock::score_mock));

    let corpus_routes = Router::new().route("/chapters", get(corpus::list_chapters));

    Router::new()
        .nest("/api/mock", mock_routes)
        .nest("/api/corpus", corpus_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
