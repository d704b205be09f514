//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated config into the host registry
//! - Build the transport, prober, coordinator and cache in dependency order
//!
//! # Design Decisions
//! - Fail fast: a transport that cannot be built is fatal
//! - Degraded hosts are not fatal; they are logged and report red

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::StatusCache;
use crate::config::{build_host_specs, StatusConfig};
use crate::probe::{Coordinator, HttpTransport, Prober, Transport, TransportError};

/// Build the status cache from `config` using the real HTTP transport.
pub fn build_cache(config: &StatusConfig, base_dir: &Path) -> Result<StatusCache, TransportError> {
    let transport = HttpTransport::new(&config.probe.user_agent)?;
    Ok(build_cache_with(config, base_dir, Arc::new(transport)))
}

/// Build the status cache from `config` on top of any transport.
pub fn build_cache_with(
    config: &StatusConfig,
    base_dir: &Path,
    transport: Arc<dyn Transport>,
) -> StatusCache {
    let hosts = build_host_specs(&config.hosts, base_dir);
    let degraded = hosts.iter().filter(|h| h.strategy.is_degraded()).count();

    let prober = Prober::new(transport, Duration::from_millis(config.probe.timeout_ms));
    let coordinator = Coordinator::new(hosts, prober);
    let cache = StatusCache::new(coordinator, Duration::from_millis(config.cache.ttl_ms));

    tracing::info!(
        hosts = config.hosts.len(),
        degraded,
        probe_timeout_ms = config.probe.timeout_ms,
        cache_ttl_ms = config.cache.ttl_ms,
        "Status engine initialized"
    );
    cache
}
