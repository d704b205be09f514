//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → host registry → transport → prober → coordinator → cache
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown.rs
//!
//! Shutdown (shutdown.rs):
//!     trigger → HTTP server stops accepting → drains → exit
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
