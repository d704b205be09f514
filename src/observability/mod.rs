//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! probe / coordinator / cache:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;
