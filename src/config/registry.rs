//! Host registry construction.
//!
//! Turns validated [`HostConfig`] entries into [`HostSpec`]s, loading
//! reference documents once. A reference or expected name that cannot be
//! loaded degrades only that host to a permanent red verdict and is logged
//! here, once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::config::schema::HostConfig;
use crate::probe::{HostSpec, Strategy, StrategyKind};

/// Why a reference document could not be loaded.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("no reference_file configured")]
    NotConfigured,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read and parse a reference JSON document.
pub fn load_reference(path: &Path) -> Result<Value, ReferenceError> {
    let content = std::fs::read(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| ReferenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the host list. Relative reference paths resolve against `base_dir`.
pub fn build_host_specs(hosts: &[HostConfig], base_dir: &Path) -> Vec<HostSpec> {
    hosts
        .iter()
        .map(|entry| HostSpec::new(entry.host.trim(), build_strategy(entry, base_dir)))
        .collect()
}

fn build_strategy(entry: &HostConfig, base_dir: &Path) -> Strategy {
    let url = entry.url.clone().unwrap_or_default();

    match entry.strategy {
        StrategyKind::BasicReachability => Strategy::BasicReachability,
        StrategyKind::UrlOk => Strategy::UrlOk { url },
        StrategyKind::AnyJson => Strategy::AnyJson { url },
        StrategyKind::NameMatch => {
            let expected = entry.expected_name.clone().filter(|name| !name.is_empty());
            if expected.is_none() {
                tracing::warn!(host = %entry.host, "No expected_name configured; host will always report red");
            }
            Strategy::NameMatch { url, expected }
        }
        StrategyKind::ExactJsonMatch => {
            let loaded = entry
                .reference_file
                .as_ref()
                .ok_or(ReferenceError::NotConfigured)
                .and_then(|path| load_reference(&base_dir.join(path)));
            let reference = match loaded {
                Ok(document) => Some(Arc::new(document)),
                Err(e) => {
                    tracing::warn!(host = %entry.host, error = %e, "Reference document unavailable; host will always report red");
                    None
                }
            };
            Strategy::ExactJsonMatch { url, reference }
        }
    }
}
