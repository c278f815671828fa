//! HTTP API server: the transport shim over the fleet dispatcher

pub mod control;
pub mod health;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::fleet::Dispatcher;
use crate::{Error, Result};

/// Shared state for API handlers
pub struct ApiState {
    /// The fleet dispatcher all handlers delegate to
    pub dispatcher: Dispatcher,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server for the given dispatcher and port
    #[must_use]
    pub fn new(dispatcher: Dispatcher, port: u16) -> Self {
        Self {
            state: Arc::new(ApiState { dispatcher }),
            port,
        }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let router = control::router(self.state.clone()).merge(health::router());

        // CORS layer for cross-origin requests from control panels
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or serve
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(
            port = self.port,
            devices = self.state.dispatcher.registry().len(),
            "API server listening"
        );

        axum::serve(listener, self.router())
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
