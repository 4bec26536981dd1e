//! Server Implementation
//!
//! HTTP server startup and shutdown

use crate::api;
use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        let state = ServerState::new(self.config.clone());
        let app = api::router(state);

        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Internal(anyhow::anyhow!("Failed to bind to {}: {}", addr, e)))?;

        tracing::info!("🖨️  xprint server listening on {}", addr);
        tracing::info!(
            vendor_ids = ?self.config.vendor_ids,
            brand = %self.config.brand,
            timeout_ms = self.config.usb_timeout_ms,
            serialized = self.config.serialize_print_jobs,
            "Printer discovery policy"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
