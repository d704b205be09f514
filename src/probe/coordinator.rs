//! Fan-out over the full host list.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;

use crate::observability::metrics;
use crate::probe::executor::Prober;
use crate::probe::types::{HostSpec, StatusSnapshot};

/// Runs one probe per host concurrently and collects the verdicts in host
/// list order.
#[derive(Clone)]
pub struct Coordinator {
    hosts: Arc<[HostSpec]>,
    prober: Prober,
}

impl Coordinator {
    pub fn new(hosts: Vec<HostSpec>, prober: Prober) -> Self {
        Self {
            hosts: hosts.into(),
            prober,
        }
    }

    pub fn hosts(&self) -> &[HostSpec] {
        &self.hosts
    }

    /// Probe every host. Completes once all probes have resolved, which is
    /// bounded by the per-probe timeout since probes never wait on each other.
    pub async fn refresh(&self) -> StatusSnapshot {
        let started = Instant::now();
        tracing::info!(hosts = self.hosts.len(), "Refreshing host status");

        let probes = self.hosts.iter().map(|spec| async move {
            let verdict = self.prober.probe(spec).await;
            (spec.host.clone(), verdict)
        });
        let snapshot = StatusSnapshot::new(join_all(probes).await);

        let elapsed = started.elapsed();
        metrics::record_refresh(elapsed);
        tracing::info!(
            hosts = snapshot.len(),
            green = snapshot.green_count(),
            duration_ms = elapsed.as_millis() as u64,
            "Refresh complete"
        );
        snapshot
    }
}
