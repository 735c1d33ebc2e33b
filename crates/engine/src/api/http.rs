//! HTTP routes.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use playerinfo_domain::{OnlinePlayers, PlayerId, ProfileSnapshot};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::stores::TimeZoneError;
use crate::use_cases::ProfileError;

const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/players", get(list_players))
        .route("/api/players/{name}", get(get_player))
        .route("/api/status", get(status))
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/cache/clear", post(clear_cache))
        .route("/api/admin/cache/duration", put(set_cache_duration))
        .route("/api/admin/cache/{name}", delete(invalidate_cached_player))
        .route(
            "/api/timezones/{uuid}",
            get(get_timezone).put(set_timezone),
        )
}

async fn list_players(State(app): State<Arc<App>>) -> Result<Json<OnlinePlayers>, ApiError> {
    let listing = app.use_cases.list_online.execute().await?;
    Ok(Json(listing))
}

async fn get_player(
    State(app): State<Arc<App>>,
    Path(name): Path<String>,
) -> Result<Json<ProfileSnapshot>, ApiError> {
    let profile = app.use_cases.get_profile.execute(&name).await?;
    Ok(Json(profile.as_ref().clone()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
    server_name: String,
    server_version: String,
    api_version: &'static str,
    api_request_count: u64,
    player_count: usize,
}

async fn status(State(app): State<Arc<App>>) -> Result<Json<StatusResponse>, ApiError> {
    let listing = app.use_cases.list_online.execute().await?;
    Ok(Json(StatusResponse {
        status: "online",
        version: API_VERSION,
        server_name: app.config.server_name.clone(),
        server_version: app.registry.server_version(),
        api_version: API_VERSION,
        api_request_count: app.request_count(),
        player_count: listing.online,
    }))
}

// =============================================================================
// Admin
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminStats {
    port: u16,
    requests_handled: u64,
    cache_entries: usize,
    cache_duration_seconds: u64,
}

async fn admin_stats(State(app): State<Arc<App>>) -> Json<AdminStats> {
    let stats = app.use_cases.cache.stats();
    Json(AdminStats {
        port: app.config.server_port,
        requests_handled: app.request_count(),
        cache_entries: stats.entries,
        cache_duration_seconds: stats.duration.as_secs(),
    })
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    cleared: usize,
}

async fn clear_cache(State(app): State<Arc<App>>) -> Json<ClearResponse> {
    Json(ClearResponse {
        cleared: app.use_cases.cache.clear(),
    })
}

async fn invalidate_cached_player(
    State(app): State<Arc<App>>,
    Path(name): Path<String>,
) -> StatusCode {
    app.use_cases.cache.invalidate(&name);
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheDuration {
    seconds: u64,
}

async fn set_cache_duration(
    State(app): State<Arc<App>>,
    Json(body): Json<CacheDuration>,
) -> Json<CacheDuration> {
    let updated = app
        .use_cases
        .cache
        .set_duration(Duration::from_secs(body.seconds));
    Json(CacheDuration {
        seconds: updated.as_secs(),
    })
}

// =============================================================================
// Timezones
// =============================================================================

#[derive(Debug, Serialize)]
struct TimeZoneResponse {
    uuid: PlayerId,
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct TimeZoneRequest {
    timezone: String,
}

fn parse_player_id(raw: &str) -> Result<PlayerId, ApiError> {
    PlayerId::from_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid player id: {raw}")))
}

async fn get_timezone(
    State(app): State<Arc<App>>,
    Path(uuid): Path<String>,
) -> Result<Json<TimeZoneResponse>, ApiError> {
    let player_id = parse_player_id(&uuid)?;
    Ok(Json(TimeZoneResponse {
        uuid: player_id,
        timezone: app.stores.timezones.get(player_id),
    }))
}

async fn set_timezone(
    State(app): State<Arc<App>>,
    Path(uuid): Path<String>,
    Json(body): Json<TimeZoneRequest>,
) -> Result<Json<TimeZoneResponse>, ApiError> {
    let player_id = parse_player_id(&uuid)?;
    app.stores.timezones.set(player_id, &body.timezone).await?;
    Ok(Json(TimeZoneResponse {
        uuid: player_id,
        timezone: app.stores.timezones.get(player_id),
    }))
}

// =============================================================================
// Fallbacks
// =============================================================================

pub async fn unknown_endpoint() -> ApiError {
    ApiError::NotFound("Invalid API endpoint".to_string())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// =============================================================================
// Error Handling
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    MethodNotAllowed,
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "Not Found", message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "Bad Request", message),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Invalid API key".to_string(),
            ),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed",
                "Method not allowed for this endpoint".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NotFound(_) => ApiError::NotFound("Player not found".to_string()),
            ProfileError::Registry(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<crate::infrastructure::ports::RegistryError> for ApiError {
    fn from(e: crate::infrastructure::ports::RegistryError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<TimeZoneError> for ApiError {
    fn from(e: TimeZoneError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
