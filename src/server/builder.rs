//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::service::BookingRepository;
use crate::storage::repository_from_config;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the booking HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::load()?)
///     .with_repository(InMemoryBookingRepository::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: Option<AppConfig>,
    repository: Option<Arc<dyn BookingRepository>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            config: None,
            repository: None,
            clock: None,
        }
    }

    /// Set the application configuration (required)
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this repository instead of the one named in the configuration
    pub fn with_repository(mut self, repository: impl BookingRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Replace the system clock, typically with a fixed one in tests
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<ServerHost> {
        let config = self
            .config
            .take()
            .ok_or_else(|| anyhow::anyhow!("AppConfig is required. Call .with_config()"))?;

        let repository = match self.repository.take() {
            Some(repository) => repository,
            None => repository_from_config(&config.storage)?,
        };

        let clock = self
            .clock
            .take()
            .unwrap_or_else(|| Arc::new(SystemClock));

        ServerHost::from_builder_components(config, repository, clock)
    }

    /// Build the final REST router
    pub fn build(self) -> Result<Router> {
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host)
    }

    /// Serve on the configured bind address with graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self
            .config
            .as_ref()
            .map(|config| config.server.bind.clone())
            .ok_or_else(|| anyhow::anyhow!("AppConfig is required. Call .with_config()"))?;
        self.serve_on(&addr).await
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve_on(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
