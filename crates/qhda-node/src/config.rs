//! Configuration types for qhda

use qhda_rpc::ServerConfig;
use qhda_scheduler::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid TOML for [`NodeConfig`]
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },
}

/// Node configuration, as read from the TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// HTTP service settings
    pub server: ServerSection,
    /// Scheduler settings
    pub scheduler: SchedulerConfig,
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Scheduling deadline per request, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Allow cross-origin requests
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_listen_addr() -> SocketAddr {
    ServerConfig::default().listen_addr
}

fn default_max_body_size() -> usize {
    ServerConfig::default().max_body_size
}

fn default_request_timeout_ms() -> u64 {
    ServerConfig::default().request_timeout.as_millis() as u64
}

fn default_enable_cors() -> bool {
    true
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_body_size: default_max_body_size(),
            request_timeout_ms: default_request_timeout_ms(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl ServerSection {
    /// Convert to the server's runtime configuration
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            listen_addr: self.listen_addr,
            max_body_size: self.max_body_size,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            enable_cors: self.enable_cors,
        }
    }
}

impl NodeConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
