//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Host identity is unique across the list
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StatusConfig → Result<(), Vec<ValidationError>>
//! - Missing expected names or reference files are not errors here; they
//!   degrade the affected host at registry build time

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::StatusConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no hosts configured")]
    NoHosts,

    #[error("host entry {index} has an empty host name")]
    EmptyHost { index: usize },

    #[error("host '{0}' is listed more than once")]
    DuplicateHost(String),

    #[error("host '{host}' uses {strategy} but has no url")]
    MissingUrl { host: String, strategy: String },

    #[error("host '{host}' has an invalid url '{url}'")]
    InvalidUrl { host: String, url: String },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &StatusConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration("probe.timeout_ms"));
    }
    if config.cache.ttl_ms == 0 {
        errors.push(ValidationError::ZeroDuration("cache.ttl_ms"));
    }
    if config.listener.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration("listener.request_timeout_ms"));
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.hosts.is_empty() {
        errors.push(ValidationError::NoHosts);
    }

    let mut seen = HashSet::new();
    for (index, entry) in config.hosts.iter().enumerate() {
        let host = entry.host.trim();
        if host.is_empty() {
            errors.push(ValidationError::EmptyHost { index });
            continue;
        }
        if !seen.insert(host) {
            errors.push(ValidationError::DuplicateHost(host.to_string()));
        }

        match entry.url.as_deref() {
            None if entry.strategy.requires_url() => {
                errors.push(ValidationError::MissingUrl {
                    host: host.to_string(),
                    strategy: format!("{:?}", entry.strategy),
                });
            }
            Some(url) if Url::parse(url).is_err() => {
                errors.push(ValidationError::InvalidUrl {
                    host: host.to_string(),
                    url: url.to_string(),
                });
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
