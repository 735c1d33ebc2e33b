//! API layer - HTTP entry points.

pub mod http;
pub mod middleware;

use std::sync::Arc;

use axum::Router;

use crate::app::App;

/// Build the full API router with request counting and bearer auth applied.
pub fn router(app: Arc<App>) -> Router {
    http::routes()
        .fallback(http::unknown_endpoint)
        .method_not_allowed_fallback(http::method_not_allowed)
        .layer(axum::middleware::from_fn_with_state(
            app.clone(),
            middleware::require_api_key,
        ))
        .layer(axum::middleware::from_fn_with_state(
            app.clone(),
            middleware::count_requests,
        ))
        .with_state(app)
}
