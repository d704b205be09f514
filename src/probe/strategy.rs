//! Verification strategies.
//!
//! A strategy turns a fetched [`ProbeResponse`] into a [`Verdict`]. Every
//! variant carries only the configuration it needs. Parse failures and
//! missing configuration resolve to [`Verdict::Red`]; nothing here returns an
//! error.

use std::sync::Arc;

use serde_json::Value;

use crate::probe::canonical::json_eq;
use crate::probe::types::{ProbeResponse, Verdict};

/// Closed set of strategy kinds, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    BasicReachability,
    UrlOk,
    AnyJson,
    NameMatch,
    ExactJsonMatch,
}

impl StrategyKind {
    pub fn requires_url(self) -> bool {
        !matches!(self, StrategyKind::BasicReachability)
    }
}

/// How a host's response is judged.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// HEAD (falling back to GET) against `https://<host>/`, status only.
    BasicReachability,
    /// Status only, against a dedicated probe URL.
    UrlOk { url: String },
    /// Ok status and a JSON body.
    AnyJson { url: String },
    /// Ok status and a JSON body whose `name` equals `expected`.
    /// `None` when the expected name failed to load.
    NameMatch { url: String, expected: Option<String> },
    /// Ok status and a JSON body structurally equal to `reference`.
    /// `None` when the reference document failed to load.
    ExactJsonMatch {
        url: String,
        reference: Option<Arc<Value>>,
    },
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::BasicReachability => StrategyKind::BasicReachability,
            Strategy::UrlOk { .. } => StrategyKind::UrlOk,
            Strategy::AnyJson { .. } => StrategyKind::AnyJson,
            Strategy::NameMatch { .. } => StrategyKind::NameMatch,
            Strategy::ExactJsonMatch { .. } => StrategyKind::ExactJsonMatch,
        }
    }

    pub fn probe_url(&self) -> Option<&str> {
        match self {
            Strategy::BasicReachability => None,
            Strategy::UrlOk { url }
            | Strategy::AnyJson { url }
            | Strategy::NameMatch { url, .. }
            | Strategy::ExactJsonMatch { url, .. } => Some(url.as_str()),
        }
    }

    /// True when configuration loading left this strategy unable to pass.
    pub fn is_degraded(&self) -> bool {
        match self {
            Strategy::NameMatch { expected, .. } => {
                expected.as_deref().map_or(true, str::is_empty)
            }
            Strategy::ExactJsonMatch { reference, .. } => reference.is_none(),
            _ => false,
        }
    }

    pub fn verify(&self, response: &ProbeResponse) -> Verdict {
        if !response.is_ok() || self.is_degraded() {
            return Verdict::Red;
        }

        match self {
            Strategy::BasicReachability | Strategy::UrlOk { .. } => Verdict::Green,
            Strategy::AnyJson { .. } => Verdict::from_bool(is_json(response)),
            Strategy::NameMatch { expected, .. } => {
                let name_matches = parse_body(response)
                    .as_ref()
                    .and_then(|body| body.get("name"))
                    .and_then(Value::as_str)
                    .is_some_and(|name| expected.as_deref() == Some(name));
                Verdict::from_bool(name_matches)
            }
            Strategy::ExactJsonMatch { reference, .. } => {
                let matches = reference.as_deref().is_some_and(|reference| {
                    parse_body(response).is_some_and(|live| json_eq(&live, reference))
                });
                Verdict::from_bool(matches)
            }
        }
    }
}

fn parse_body(response: &ProbeResponse) -> Option<Value> {
    serde_json::from_slice(&response.body).ok()
}

fn is_json(response: &ProbeResponse) -> bool {
    let declared = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
    declared || parse_body(response).is_some()
}
