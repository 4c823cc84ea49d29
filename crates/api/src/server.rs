//! Server configuration and startup.

use crate::error::ApiError;
use crate::routes::create_router;
use crate::state::AppState;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, `host:port`.
    pub bind_address: String,
    /// Whether to allow cross-origin requests.
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            enable_cors: true,
        }
    }
}

/// Webhook server.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Creates a new server.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Router with tracing and CORS layers applied.
    pub fn router(&self) -> Router {
        let router = create_router(self.state.clone());
        let router = if self.config.enable_cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        };
        router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Binds and serves until the process stops.
    pub async fn run(self) -> Result<(), ApiError> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_address)
            .await
            .map_err(|source| ApiError::Bind {
                address: self.config.bind_address.clone(),
                source,
            })?;
        info!(address = %self.config.bind_address, "Server is running");

        axum::serve(listener, app).await.map_err(ApiError::Serve)
    }
}
