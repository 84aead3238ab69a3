pub mod config;
pub mod error;

pub use config::{
    Config, KeepAliveConfig, LaunchConfig, LocaleConfig, RefreshConfig, StoreConfig,
    TimelineConfig, ValidationIssue, ValidationResult,
};
pub use error::{AppError, ConfigError, HostError, StoreError};

use anyhow::Result;

/// Initialize logging for the widget process.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init() -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("FishWx core initialized");
    }
    Ok(())
}
