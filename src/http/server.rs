//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with the status handlers
//! - Wire up middleware (tracing, request timeout)
//! - Serve until the shutdown signal fires

use axum::{extract::State, routing::get, Json, Router};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cache::StatusCache;
use crate::config::ListenerConfig;
use crate::probe::StatusSnapshot;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: StatusCache,
}

/// HTTP front end for the status cache.
pub struct StatusServer {
    router: Router,
}

impl StatusServer {
    pub fn new(cache: StatusCache, config: &ListenerConfig) -> Self {
        let router = Self::build_router(AppState { cache }, config);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState, config: &ListenerConfig) -> Router {
        Router::new()
            .route("/status", get(status_handler))
            .route("/healthz", get(liveness_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms)))
            .layer(TraceLayer::new_for_http())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /status`: `[{"<host>": "green" | "red"}, ...]` in configured order.
async fn status_handler(State(state): State<AppState>) -> Json<StatusSnapshot> {
    let snapshot = state.cache.get().await;
    Json(StatusSnapshot::clone(&snapshot))
}

async fn liveness_handler() -> &'static str {
    "ok"
}
