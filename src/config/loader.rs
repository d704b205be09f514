//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::StatusConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_PROBE_TIMEOUT_MS: &str = "STATUSD_PROBE_TIMEOUT_MS";
pub const ENV_CACHE_TTL_MS: &str = "STATUSD_CACHE_TTL_MS";
pub const ENV_BIND_ADDRESS: &str = "STATUSD_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, apply environment overrides, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<StatusConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Parse `content` with overrides looked up through `env`.
pub fn parse_config<F>(content: &str, env: F) -> Result<StatusConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: StatusConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    apply_env_overrides(&mut config, env);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay env-style settings onto `config`. Unparsable values are logged
/// and ignored.
pub fn apply_env_overrides<F>(config: &mut StatusConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(ms) = env_millis(&env, ENV_PROBE_TIMEOUT_MS) {
        config.probe.timeout_ms = ms;
    }
    if let Some(ms) = env_millis(&env, ENV_CACHE_TTL_MS) {
        config.cache.ttl_ms = ms;
    }
    if let Some(addr) = env(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
}

fn env_millis<F>(env: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(ms) => Some(ms),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid environment override");
            None
        }
    }
}
