//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, environment overrides)
//!     → validation.rs (semantic checks)
//!     → StatusConfig (validated, immutable)
//!     → registry.rs (HostSpec list, reference documents loaded once)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the host list is fixed for the process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A broken reference document degrades one host, it never fails startup

pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use registry::build_host_specs;
pub use schema::{CacheConfig, HostConfig, ListenerConfig, ObservabilityConfig, ProbeConfig, StatusConfig};
pub use validation::ValidationError;
