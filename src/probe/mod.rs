//! Probing subsystem.
//!
//! # Data Flow
//! ```text
//! coordinator.rs (one refresh)
//!     → executor.rs, one probe per host, all concurrent
//!         → transport.rs (HEAD / GET under the probe deadline)
//!         → strategy.rs (response → verdict)
//!             → canonical.rs (structural JSON equality)
//!     → StatusSnapshot in host list order
//! ```
//!
//! # Design Decisions
//! - A probe always resolves to a verdict; failures never cross hosts
//! - Strategies are a closed enum, configuration lives in the variant
//! - The transport is a trait so tests can count and script requests

pub mod canonical;
pub mod coordinator;
pub mod executor;
pub mod strategy;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::Coordinator;
pub use executor::Prober;
pub use strategy::{Strategy, StrategyKind};
pub use transport::{HttpTransport, ProbeMethod, Transport, TransportError};
pub use types::{HostSpec, ProbeResponse, StatusSnapshot, Verdict};
