//! Runtime configuration for the CLI and the web server.

use crate::error::{Result, WineError};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8501;

/// Locations of the two startup artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifacts: ArtifactPaths,
}

impl ServerConfig {
    /// Config with default bind address.
    #[must_use]
    pub fn new(artifacts: ArtifactPaths) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            artifacts,
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Parse the bind address.
    ///
    /// # Errors
    ///
    /// Returns `Server` if host and port do not form a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| WineError::Server(format!("invalid address {}:{}: {e}", self.host, self.port)))
    }
}
