//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing, panic
//! catching) and returns the axum router ready for serving.

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::error;

use super::error::AppError;
use super::handlers;
use super::state::AppState;

/// Largest accepted request body. Text is capped at 10,000 characters after
/// trimming, so this leaves room for multi-byte text and surrounding blanks.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// CORS for the single frontend origin, with credentials.
pub fn cors_layer(frontend_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = message, "handler panicked");

    AppError::Internal { details: None }.into_response()
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState, frontend_origin: HeaderValue) -> Router {
    let api = Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/history", get(handlers::history))
        .route("/history/{id}", get(handlers::get_analysis))
        .route("/config", get(handlers::get_config));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(frontend_origin))
        .with_state(state)
}
