//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! GET /status
//!     → server.rs (Axum handler)
//!     → StatusCache::get()
//!     → JSON array of {host: verdict}
//! ```

pub mod server;

pub use server::{AppState, StatusServer};
