// ABOUTME: Configuration loading and validation for the eventday server.
// ABOUTME: Reads environment variables with defaults; the cache TTL is a knob, not a constant.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("EVENTDAY_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("EVENTDAY_CACHE_TTL_SECS must be a positive number of seconds: {0}")]
    InvalidTtl(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub log_path: PathBuf,
    pub fellows_path: PathBuf,
    pub events_path: PathBuf,
    pub cache_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - EVENTDAY_BIND: socket address to bind (default: 127.0.0.1:7410)
    /// - EVENTDAY_LOG: registration log file (default: data/registrations.jsonl)
    /// - EVENTDAY_FELLOWS: fellow directory JSON (default: data/fellows.json)
    /// - EVENTDAY_EVENTS: event catalog JSON (default: data/events.json)
    /// - EVENTDAY_CACHE_TTL_SECS: snapshot cache TTL (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_str =
            std::env::var("EVENTDAY_BIND").unwrap_or_else(|_| "127.0.0.1:7410".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let log_path = std::env::var("EVENTDAY_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/registrations.jsonl"));

        let fellows_path = std::env::var("EVENTDAY_FELLOWS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/fellows.json"));

        let events_path = std::env::var("EVENTDAY_EVENTS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/events.json"));

        let ttl_str =
            std::env::var("EVENTDAY_CACHE_TTL_SECS").unwrap_or_else(|_| "60".to_string());
        let cache_ttl_secs: u64 = ttl_str
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTtl(ttl_str))?;

        Ok(Self {
            bind,
            log_path,
            fellows_path,
            events_path,
            cache_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_loads_defaults() {
        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::remove_var("EVENTDAY_BIND");
            std::env::remove_var("EVENTDAY_LOG");
            std::env::remove_var("EVENTDAY_FELLOWS");
            std::env::remove_var("EVENTDAY_EVENTS");
            std::env::remove_var("EVENTDAY_CACHE_TTL_SECS");
        }

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.bind, "127.0.0.1:7410".parse::<SocketAddr>().unwrap());
        assert_eq!(config.cache_ttl_secs, 60);
        assert!(config.log_path.to_string_lossy().ends_with(".jsonl"));
    }

    #[test]
    fn config_rejects_zero_ttl() {
        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::remove_var("EVENTDAY_BIND");
            std::env::set_var("EVENTDAY_CACHE_TTL_SECS", "0");
        }

        let result = ServerConfig::from_env();

        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::remove_var("EVENTDAY_CACHE_TTL_SECS");
        }

        assert!(matches!(result, Err(ConfigError::InvalidTtl(_))));
    }

    #[test]
    fn config_rejects_bad_bind() {
        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::remove_var("EVENTDAY_CACHE_TTL_SECS");
            std::env::set_var("EVENTDAY_BIND", "not-an-addr");
        }

        let result = ServerConfig::from_env();

        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::remove_var("EVENTDAY_BIND");
        }

        assert!(matches!(result, Err(ConfigError::InvalidBind(_))));
    }
}
