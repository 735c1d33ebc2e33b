//! HTTP middleware for the player API
//!
//! - `count_requests` - counts every request and optionally logs it
//! - `require_api_key` - static bearer token check when an API key is configured

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::http::ApiError;
use crate::app::App;

pub async fn count_requests(State(app): State<Arc<App>>, request: Request, next: Next) -> Response {
    let count = app.record_request();
    if app.config.debug.log_api_requests {
        tracing::info!(
            method = %request.method(),
            uri = %request.uri(),
            count,
            "API request received"
        );
    }
    next.run(request).await
}

/// Reject requests without `Authorization: Bearer <API_KEY>`.
///
/// An empty configured key disables the check.
pub async fn require_api_key(
    State(app): State<Arc<App>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = app.config.api.api_key.as_str();
    if expected.is_empty() {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if provided != Some(expected) {
        tracing::debug!(uri = %request.uri(), "Rejected request with invalid API key");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
