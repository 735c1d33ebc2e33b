//! Player info engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playerinfo_engine::api;
use playerinfo_engine::infrastructure::{
    clock::SystemClock,
    config::{ApiConfig, AppConfig},
    ports::{ClockPort, PlayerRegistryPort},
    registry::InMemoryPlayerRegistry,
    timezone_file::JsonFileTimeZoneRepo,
};
use playerinfo_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playerinfo_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting player info engine");

    let config = AppConfig::from_env()?;

    let cancel_token = CancellationToken::new();
    setup_shutdown_signal(cancel_token.clone());

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let registry = Arc::new(InMemoryPlayerRegistry::new(
        config.max_players,
        format!("playerinfo-engine {}", env!("CARGO_PKG_VERSION")),
        clock.clone(),
    ));
    let registry_port: Arc<dyn PlayerRegistryPort> = registry.clone();
    let timezone_repo = Arc::new(JsonFileTimeZoneRepo::new(config.timezone_data_path.clone()));

    // No permission system or AFK integration is attached to the standalone server.
    let app = Arc::new(App::new(
        config.clone(),
        registry_port,
        None,
        None,
        timezone_repo,
        clock,
    ));

    registry.attach_listener(app.use_cases.events.clone());
    app.stores.timezones.load().await;

    let mut router = api::router(app.clone()).layer(TraceLayer::new_for_http());
    if let Some(cors) = build_cors_layer(&config.api) {
        router = router.layer(cors);
    }

    let addr: SocketAddr = config.bind_addr().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown = cancel_token.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown.cancelled().await;
        tracing::info!("HTTP server received shutdown signal");
    });

    if let Err(e) = server.await {
        tracing::error!("Server error: {}", e);
    }

    cancel_token.cancel();
    app.stores.timezones.shutdown().await;
    tracing::info!("Player info engine stopped");
    Ok(())
}

/// Cancel `cancel_token` on Ctrl+C or SIGTERM.
fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }

        cancel_token.cancel();
    });
}

fn build_cors_layer(config: &ApiConfig) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS enabled but no valid origins configured, CORS headers disabled");
        return None;
    }

    Some(cors.allow_origin(origins))
}
