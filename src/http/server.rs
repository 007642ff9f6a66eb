//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the axum router for the control API
//! - Wire up middleware (request id, tracing, body limit, timeout)
//! - Serve until the shutdown broadcast fires, then stop the active run

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::SynthConfig;
use crate::control::ControlSession;
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ControlSession>,
}

pub struct HttpServer {
    router: Router,
    session: Arc<ControlSession>,
}

impl HttpServer {
    pub fn new(config: SynthConfig) -> Self {
        let config = Arc::new(config);
        let session = Arc::new(ControlSession::new(config.clone()));
        let router = Self::build_router(&config, AppState { session: session.clone() });
        Self { router, session }
    }

    #[allow(deprecated)]
    fn build_router(config: &SynthConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/connect", post(handlers::connect))
            .route("/api/industries", get(handlers::industries))
            .route("/api/scenarios", get(handlers::scenarios))
            .route("/api/generate", post(handlers::generate))
            .route("/api/stop", post(handlers::stop))
            .route("/api/stats", get(handlers::stats))
            .route("/api/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    pub fn session(&self) -> Arc<ControlSession> {
        self.session.clone()
    }

    /// The router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires. The active run is stopped before returning.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        if let Some(report) = self.session.shutdown().await {
            tracing::info!(
                batches = report.batches,
                failed_ticks = report.failed_ticks,
                reason = ?report.stop_reason,
                "Active run stopped"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
