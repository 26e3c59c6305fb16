//! Router construction and the listener loop.

use crate::error::Result;
use crate::routes::{self, health, track};
use axum::Router;
use axum::routing::get;
use skylink_client::{CmsClient, TrackingClient};
use skylink_core::SkylinkConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Immutable state shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    /// Effective configuration.
    pub config: SkylinkConfig,
    /// Carrier API client.
    pub tracking: TrackingClient,
    /// CMS client used by the health probe.
    pub cms: CmsClient,
    started_at: Instant,
}

/// Handle passed to handlers.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Builds both clients from `config`.
    pub fn new(config: SkylinkConfig) -> Self {
        let tracking = TrackingClient::from_config(&config);
        let cms = CmsClient::from_config(&config);
        Self::with_clients(config, tracking, cms)
    }

    /// Uses caller-supplied clients.
    pub fn with_clients(config: SkylinkConfig, tracking: TrackingClient, cms: CmsClient) -> Self {
        Self {
            config,
            tracking,
            cms,
            started_at: Instant::now(),
        }
    }

    /// Time since the state was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route(routes::TRACK_PATH, get(track::track_handler))
        .route(routes::HEALTH_PATH, get(health::health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `server.host:server.port` and serves until Ctrl-C.
pub async fn serve(config: SkylinkConfig) -> Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;

    tracing::info!(
        address = %address,
        environment = %config.environment,
        tracking_url = %config.tracking.base_url,
        cms_url = %config.cms.base_url,
        "SkyLink API listening"
    );

    let state = Arc::new(AppState::new(config));
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("SkyLink API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
