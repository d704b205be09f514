//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Every section has defaults so a minimal file only lists hosts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_TTL;
use crate::probe::executor::DEFAULT_PROBE_TIMEOUT;
use crate::probe::StrategyKind;

/// Root configuration for the status service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StatusConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound probe settings.
    pub probe: ProbeConfig,

    /// Snapshot cache settings.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Monitored hosts, in the order they are reported.
    pub hosts: Vec<HostConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound for serving one status request, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-probe deadline in milliseconds, shared by HEAD and GET fallback.
    pub timeout_ms: u64,

    /// User-Agent sent with every probe.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            user_agent: concat!("statusd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Snapshot lifetime after a refresh completes, in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_CACHE_TTL.as_millis() as u64,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One monitored host.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    /// Host name; unique across the list.
    pub host: String,

    /// Verification strategy.
    #[serde(default = "default_strategy")]
    pub strategy: StrategyKind,

    /// Probe URL. Required for every strategy except basic reachability.
    #[serde(default)]
    pub url: Option<String>,

    /// Expected `name` field (name_match). Compared exactly, whitespace
    /// included; an empty value degrades the host to red.
    #[serde(default)]
    pub expected_name: Option<String>,

    /// Reference JSON document (exact_json_match). Relative paths resolve
    /// against the config file's directory.
    #[serde(default)]
    pub reference_file: Option<PathBuf>,
}

fn default_strategy() -> StrategyKind {
    StrategyKind::BasicReachability
}

impl HostConfig {
    /// Basic reachability entry for `host`.
    pub fn basic(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            strategy: StrategyKind::BasicReachability,
            url: None,
            expected_name: None,
            reference_file: None,
        }
    }

    /// Entry probing `url` with `strategy`.
    pub fn with_url(host: impl Into<String>, strategy: StrategyKind, url: impl Into<String>) -> Self {
        Self {
            strategy,
            url: Some(url.into()),
            ..Self::basic(host)
        }
    }
}
