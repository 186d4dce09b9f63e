use anyhow::Result;
use booking_desk::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("booking_desk=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        bind = %config.server.bind,
        backend = ?config.storage.backend,
        supervisor = %config.auth.username,
        "starting booking-desk"
    );

    ServerBuilder::new().with_config(config).serve().await
}
