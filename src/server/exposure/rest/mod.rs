//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with health, auth and
//! booking routes, wrapped in request tracing and CORS.

use super::super::host::ServerHost;
use crate::config::ServerConfig;
use crate::server::router::{build_auth_routes, build_booking_routes};
use anyhow::Result;
use axum::http::HeaderValue;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Name reported by the health endpoints
pub const SERVICE_NAME: &str = "booking-desk";

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// # Arguments
    ///
    /// * `host` - The server host containing all application state
    ///
    /// # Returns
    ///
    /// Returns a fully configured Axum router with:
    /// - Health check routes
    /// - Auth routes
    /// - Booking routes
    pub fn build_router(host: Arc<ServerHost>) -> Result<Router> {
        let state = host.app_state();

        let app = Self::health_routes()
            .merge(build_auth_routes(state.clone()))
            .merge(build_booking_routes(state))
            .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Self::cors_layer(&host.config.server)),
        );

        Ok(app)
    }

    /// CORS for the configured origins; any origin when none are listed
    fn cors_layer(config: &ServerConfig) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if config.cors_origins.is_empty() {
            return layer.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }
}
