//! Single-host probe execution.
//!
//! # Responsibilities
//! - Pick the target URL for a host
//! - Issue the request(s) under one deadline per probe
//! - Hand the response to the host's strategy
//!
//! # Design Decisions
//! - Every exit path yields a [`Verdict`]; transport errors stay inside
//! - Sub-requests of one probe share the same deadline instant
//! - Only basic reachability retries, once, with GET after HEAD

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};

use crate::observability::metrics;
use crate::probe::strategy::Strategy;
use crate::probe::transport::{ProbeMethod, Transport, TransportError};
use crate::probe::types::{HostSpec, ProbeResponse, Verdict};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2500);

/// Probes one host at a time against a shared transport.
#[derive(Clone)]
pub struct Prober {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl Prober {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Probe `spec`. Resolves within the probe timeout plus scheduling slack.
    pub async fn probe(&self, spec: &HostSpec) -> Verdict {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let url = spec.target_url();

        let verdict = match &spec.strategy {
            Strategy::BasicReachability => self.probe_reachability(spec, &url, deadline).await,
            strategy => match self.fetch(ProbeMethod::Get, &url, deadline).await {
                Ok(response) => {
                    let verdict = strategy.verify(&response);
                    if !verdict.is_green() {
                        tracing::debug!(
                            host = %spec.host,
                            status = response.status,
                            strategy = ?strategy.kind(),
                            "Response rejected by strategy"
                        );
                    }
                    verdict
                }
                Err(e) => {
                    tracing::warn!(host = %spec.host, url = %url, error = %e, "Probe failed");
                    Verdict::Red
                }
            },
        };

        tracing::debug!(
            host = %spec.host,
            verdict = %verdict,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Probe complete"
        );
        metrics::record_probe(&spec.host, verdict);
        verdict
    }

    /// HEAD first; one GET fallback if HEAD failed or came back not ok.
    async fn probe_reachability(&self, spec: &HostSpec, url: &str, deadline: Instant) -> Verdict {
        match self.fetch(ProbeMethod::Head, url, deadline).await {
            Ok(response) if response.is_ok() => return Verdict::Green,
            Ok(response) => {
                tracing::debug!(host = %spec.host, status = response.status, "HEAD not ok, retrying with GET");
            }
            Err(e) => {
                tracing::debug!(host = %spec.host, error = %e, "HEAD failed, retrying with GET");
            }
        }

        match self.fetch(ProbeMethod::Get, url, deadline).await {
            Ok(response) => spec.strategy.verify(&response),
            Err(e) => {
                tracing::warn!(host = %spec.host, url = %url, error = %e, "Probe failed");
                Verdict::Red
            }
        }
    }

    /// One request bounded by `deadline`. The request future is dropped when
    /// the deadline fires, which aborts the underlying connection.
    async fn fetch(
        &self,
        method: ProbeMethod,
        url: &str,
        deadline: Instant,
    ) -> Result<ProbeResponse, TransportError> {
        match time::timeout_at(deadline, self.transport.send(method, url)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }
}
