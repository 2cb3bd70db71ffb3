//! Upload server configuration

use std::net::SocketAddr;
use thiserror::Error;

/// Default upload limit, 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const BIND_ENV: &str = "CSVZIP_BIND";
const MAX_UPLOAD_ENV: &str = "CSVZIP_MAX_UPLOAD_BYTES";

/// Invalid configuration value
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the upload server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Set bind address (builder pattern)
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set upload limit (builder pattern)
    pub fn max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Read `CSVZIP_BIND` and `CSVZIP_MAX_UPLOAD_BYTES`, keeping defaults
    /// for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(BIND_ENV) {
            config.bind_addr = value.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    name: BIND_ENV,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = lookup(MAX_UPLOAD_ENV) {
            config.max_upload_bytes =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        name: MAX_UPLOAD_ENV,
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
        }

        Ok(config)
    }
}
