//! Campus Compass
//!
//! Campus map dashboard core: facility search, map viewport control,
//! the animated navigation drawer and persisted session hydration.
//!
//! This crate re-exports the workspace crates under one roof and provides
//! logging setup for host shells.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use app_core as domain;
pub use app_platform as platform;
pub use app_state as state;
pub use app_ui as ui;
pub use storage;

use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global `tracing` subscriber
///
/// Honors `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`]. Fails if a
/// global subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    tracing::debug!("tracing initialised");
    Ok(())
}
