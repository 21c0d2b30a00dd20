//! Listener and request handling settings.
//!
//! # Environment Variables
//!
//! - `SERVER_HOST`: bind address (default `0.0.0.0`)
//! - `SERVER_PORT`: bind port (default `3000`)
//! - `REQUEST_BODY_LIMIT`: maximum buffered request body in bytes (default 1 MiB)
//! - `METRICS_ENABLED`: expose `/metrics` (default `true`)
//! - `LOG_DIR`: directory for JSON log files (unset disables file logging)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
    pub metrics_enabled: bool,
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit: 1024 * 1024,
            metrics_enabled: true,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            body_limit: env::var("REQUEST_BODY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.body_limit),
            metrics_enabled: env::var("METRICS_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.metrics_enabled),
            log_dir: env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
