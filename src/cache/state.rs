//! Cache state machine.
//!
//! # States
//! - Empty: nothing published, no refresh running
//! - Refreshing: a refresh is running; readers join it
//! - Valid: published snapshot, now < expires_at
//! - Stale: published snapshot past expiry, no refresh running
//!
//! # State Transitions
//! ```text
//! Empty | Stale → Refreshing: first reader starts a refresh
//! Refreshing → Valid: refresh publishes, expires_at = completion + ttl
//! Valid → Stale: clock passes expires_at
//! Refreshing → Empty | Stale: refresh task died without publishing
//! ```

use std::sync::Arc;

use futures_util::future::{BoxFuture, Shared};
use tokio::time::Instant;

use crate::probe::StatusSnapshot;

/// Handle every reader of one refresh awaits.
pub type SharedRefresh = Shared<BoxFuture<'static, Arc<StatusSnapshot>>>;

/// Externally visible phase of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePhase {
    Empty,
    Valid,
    Stale,
    Refreshing,
}

#[derive(Debug, Clone)]
struct Published {
    snapshot: Arc<StatusSnapshot>,
    expires_at: Instant,
}

/// Mutable state behind the cache lock. Never held across an await.
#[derive(Default)]
pub struct CacheState {
    published: Option<Published>,
    in_flight: Option<(u64, SharedRefresh)>,
    generation: u64,
}

impl CacheState {
    pub fn phase(&self, now: Instant) -> CachePhase {
        if self.in_flight.is_some() {
            return CachePhase::Refreshing;
        }
        match &self.published {
            None => CachePhase::Empty,
            Some(p) if now < p.expires_at => CachePhase::Valid,
            Some(_) => CachePhase::Stale,
        }
    }

    /// The published snapshot if it has not expired.
    pub fn fresh(&self, now: Instant) -> Option<Arc<StatusSnapshot>> {
        self.published
            .as_ref()
            .filter(|p| now < p.expires_at)
            .map(|p| p.snapshot.clone())
    }

    /// The last published snapshot regardless of expiry.
    pub fn last(&self) -> Option<Arc<StatusSnapshot>> {
        self.published.as_ref().map(|p| p.snapshot.clone())
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.published.as_ref().map(|p| p.expires_at)
    }

    pub fn in_flight(&self) -> Option<SharedRefresh> {
        self.in_flight.as_ref().map(|(_, refresh)| refresh.clone())
    }

    /// Reserve the next generation number for a refresh about to start.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn begin(&mut self, generation: u64, refresh: SharedRefresh) {
        debug_assert!(self.in_flight.is_none(), "refresh already in flight");
        self.in_flight = Some((generation, refresh));
    }

    /// Publish the result of `generation` and leave the Refreshing state.
    /// Returns false if that generation is no longer the one in flight.
    pub fn complete(&mut self, generation: u64, snapshot: Arc<StatusSnapshot>, expires_at: Instant) -> bool {
        if !self.owns(generation) {
            return false;
        }
        self.published = Some(Published { snapshot, expires_at });
        self.in_flight = None;
        true
    }

    /// Leave the Refreshing state without publishing.
    pub fn abandon(&mut self, generation: u64) -> bool {
        if !self.owns(generation) {
            return false;
        }
        self.in_flight = None;
        true
    }

    fn owns(&self, generation: u64) -> bool {
        matches!(self.in_flight, Some((g, _)) if g == generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::time::Duration;

    fn refresh() -> SharedRefresh {
        async { Arc::new(StatusSnapshot::default()) }.boxed().shared()
    }

    #[test]
    fn test_phase_transitions() {
        let now = Instant::now();
        let mut state = CacheState::default();
        assert_eq!(state.phase(now), CachePhase::Empty);
        assert!(state.fresh(now).is_none());

        let generation = state.next_generation();
        state.begin(generation, refresh());
        assert_eq!(state.phase(now), CachePhase::Refreshing);
        assert!(state.in_flight().is_some());

        let expires_at = now + Duration::from_secs(30);
        assert!(state.expires_at().is_none());
        assert!(state.complete(generation, Arc::new(StatusSnapshot::default()), expires_at));
        assert_eq!(state.expires_at(), Some(expires_at));
        assert_eq!(state.phase(now), CachePhase::Valid);
        assert!(state.in_flight().is_none());
        assert!(state.fresh(now).is_some());

        let later = expires_at + Duration::from_millis(1);
        assert_eq!(state.phase(later), CachePhase::Stale);
        assert!(state.fresh(later).is_none());
        assert!(state.last().is_some());
    }

    #[test]
    fn test_expiry_boundary_is_stale() {
        let now = Instant::now();
        let mut state = CacheState::default();
        let generation = state.next_generation();
        state.begin(generation, refresh());
        state.complete(generation, Arc::new(StatusSnapshot::default()), now);
        assert_eq!(state.phase(now), CachePhase::Stale);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let now = Instant::now();
        let mut state = CacheState::default();
        let first = state.next_generation();
        state.begin(first, refresh());
        assert!(state.abandon(first));
        assert_eq!(state.phase(now), CachePhase::Empty);

        let second = state.next_generation();
        state.begin(second, refresh());
        assert!(!state.complete(first, Arc::new(StatusSnapshot::default()), now));
        assert!(!state.abandon(first));
        assert_eq!(state.phase(now), CachePhase::Refreshing);
    }
}
