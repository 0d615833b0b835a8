//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use hiroba_shared::time::SystemClock;
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::ConnectionRegistry,
    infrastructure::registry::InMemoryConnectionRegistry,
    usecase::{BroadcastHub, ParticipantSession},
};

use super::{
    handler::{get_participants, get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Broadcast hub server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(ServerConfig::default());
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
}

/// Build the router with every endpoint
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/participants", get(get_participants))
        .route("/api/stats", get(get_stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, binding fails, or
    /// the server fails while running.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let hub_config = self.config.hub_config()?;
        let settings = self.config.session_settings()?;
        let shutdown_grace = settings.shutdown_grace;

        // 1. Registry と Hub
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
        let (hub, dispatch_task) = BroadcastHub::start(registry.clone(), hub_config);

        // 2. セッション
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let session = ParticipantSession::new(
            registry.clone(),
            hub.clone(),
            Arc::new(SystemClock),
            settings,
            shutdown_rx,
        );

        // 3. Router
        let app = build_router(Arc::new(AppState {
            session,
            hub,
            registry,
        }));

        tracing::info!(
            "Hiroba hub listening on {} (inbound: {}, outbound: {}, echo: {})",
            listener.local_addr()?,
            self.config.inbound_capacity,
            self.config.outbound_capacity,
            self.config.echo_to_sender
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                // Sessions live outside axum's connection tracking once upgraded.
                let _ = shutdown_tx.send(true);
            })
            .await?;

        // The dispatch task ends once the last session has released the hub.
        if tokio::time::timeout(shutdown_grace, dispatch_task).await.is_err() {
            tracing::warn!("Broadcast hub did not drain within {:?}", shutdown_grace);
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
