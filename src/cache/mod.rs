//! Time-to-live status cache with single-flight refresh.
//!
//! # Data Flow
//! ```text
//! reader → StatusCache::get()
//!     → Valid: stored snapshot, no network
//!     → Refreshing: await the shared in-flight refresh
//!     → Empty | Stale: spawn one refresh, share it, await it
//!
//! refresh task:
//!     Coordinator::refresh()
//!     → lock, publish snapshot + expiry, clear in-flight, unlock
//!     → resolve the shared handle for every joined reader
//! ```
//!
//! # Design Decisions
//! - The lock is only held to inspect or swap state, never across probing
//! - Publishing happens before the shared handle resolves, so a reader that
//!   arrives as the refresh finishes sees the new snapshot or joins the
//!   finished run; it never starts a second one
//! - The refresh runs as its own task, so readers that give up early do not
//!   strand it

pub mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::FutureExt;
use tokio::time::Instant;

use crate::observability::metrics;
use crate::probe::{Coordinator, StatusSnapshot};

pub use state::{CachePhase, CacheState, SharedRefresh};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(30_000);

struct Inner {
    coordinator: Coordinator,
    ttl: Duration,
    state: Mutex<CacheState>,
    refreshes: AtomicU64,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cached, de-duplicated access to the latest [`StatusSnapshot`].
#[derive(Clone)]
pub struct StatusCache {
    inner: Arc<Inner>,
}

impl StatusCache {
    pub fn new(coordinator: Coordinator, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                coordinator,
                ttl,
                state: Mutex::new(CacheState::default()),
                refreshes: AtomicU64::new(0),
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Number of refresh runs started so far.
    pub fn refresh_count(&self) -> u64 {
        self.inner.refreshes.load(Ordering::Relaxed)
    }

    pub fn phase(&self) -> CachePhase {
        self.inner.lock().phase(Instant::now())
    }

    /// Last published snapshot, even if expired. Never triggers a refresh.
    pub fn peek(&self) -> Option<Arc<StatusSnapshot>> {
        self.inner.lock().last()
    }

    /// Current snapshot, refreshing first if there is no valid one.
    /// Always returns a snapshot with one entry per configured host.
    pub async fn get(&self) -> Arc<StatusSnapshot> {
        let refresh = {
            let mut state = self.inner.lock();
            if let Some(snapshot) = state.fresh(Instant::now()) {
                metrics::record_cache_request("hit");
                return snapshot;
            }
            match state.in_flight() {
                Some(refresh) => {
                    metrics::record_cache_request("joined");
                    refresh
                }
                None => {
                    metrics::record_cache_request("refresh");
                    self.start_refresh(&mut state)
                }
            }
        };

        refresh.await
    }

    /// Spawn a refresh and register it as the in-flight handle.
    /// Called with the state lock held.
    fn start_refresh(&self, state: &mut CacheState) -> SharedRefresh {
        let generation = state.next_generation();
        self.inner.refreshes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(generation, "Starting status refresh");

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let snapshot = Arc::new(inner.coordinator.refresh().await);
            let expires_at = Instant::now() + inner.ttl;
            if !inner.lock().complete(generation, snapshot.clone(), expires_at) {
                tracing::warn!(generation, "Refresh finished after being superseded");
            }
            snapshot
        });

        let inner = Arc::clone(&self.inner);
        let refresh = async move {
            match task.await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::error!(generation, error = %e, "Refresh task failed");
                    inner.lock().abandon(generation);
                    Arc::new(StatusSnapshot::all_red(inner.coordinator.hosts()))
                }
            }
        }
        .boxed()
        .shared();

        state.begin(generation, refresh.clone());
        refresh
    }
}
