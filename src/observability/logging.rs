//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - The subscriber is installed before configuration loads, so config
//!   warnings are not lost; the configured level is applied afterwards
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Level used until configuration has been loaded.
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> String {
    format!("statusd={level},tower_http={level}")
}

/// Swaps the active filter once the configured level is known.
pub struct LogLevel {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogLevel {
    /// Apply `level`. No-op when `RUST_LOG` pinned the filter or another
    /// subscriber was already installed.
    pub fn set(&self, level: &str) {
        let Some(handle) = &self.handle else {
            return;
        };
        if let Err(e) = handle.reload(EnvFilter::new(default_filter(level))) {
            tracing::warn!(level, error = %e, "Failed to apply configured log level");
        }
    }
}

/// Install the global subscriber at `level`. Safe to call more than once;
/// later calls are ignored.
pub fn init_logging(level: &str) -> LogLevel {
    let from_env = EnvFilter::try_from_default_env().ok();
    let pinned = from_env.is_some();
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(default_filter(level)));
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    LogLevel {
        handle: (installed && !pinned).then_some(handle),
    }
}
