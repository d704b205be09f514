//! Composite health-check engine.
//!
//! Probes a fixed list of hosts concurrently, judges each response with a
//! per-host strategy, and serves the verdicts through a TTL cache that runs
//! at most one refresh at a time.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;

pub use cache::StatusCache;
pub use config::StatusConfig;
pub use http::StatusServer;
pub use lifecycle::Shutdown;
pub use probe::{HostSpec, StatusSnapshot, Strategy, Verdict};
