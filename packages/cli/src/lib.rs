//! Shared plumbing for the `atelier` binary: tracing setup, settings
//! loading, and generator draft persistence.

pub mod draft;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use atelier_config::{constants::ATELIER_LOG, Settings};

/// Initialize tracing from `ATELIER_LOG` (falling back to `info`).
/// Logs go to stderr so table and prompt output stay clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(ATELIER_LOG).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load `.env` if present, then build settings from the environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    dotenvy::dotenv().ok();
    Settings::from_env().context("failed to load settings from environment")
}
