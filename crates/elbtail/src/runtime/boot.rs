//! Boot — logging init and config load.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::Config;

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elbtail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    config.validate()?;

    info!(
        "Configuration: input={}, workers={}, fail_fast={}",
        config
            .input
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string()),
        config.workers,
        config.fail_fast
    );

    Ok(config)
}
