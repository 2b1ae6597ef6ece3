//! Transport registry.
//!
//! Maps each transport type to its connection parameters. The map is guarded
//! by an async `RwLock` so registration and lookup may happen from any task.

use super::TransportType;
use crate::config::AppConfig;
use crate::error::{Result, TaskBridgeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Option key for the streamable HTTP endpoint path.
pub const OPTION_ENDPOINT: &str = "endpoint";
/// Option key for the SSE stream path.
pub const OPTION_SSE_PATH: &str = "sse_path";
/// Option key for the SSE message POST path.
pub const OPTION_POST_PATH: &str = "post_path";
/// Option key for the SSE keep-alive interval in seconds.
pub const OPTION_KEEP_ALIVE_SECS: &str = "keep_alive_secs";

/// Connection parameters for one transport type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub transport: TransportType,
    pub address: String,
    pub port: u16,
    /// Graceful shutdown bound, in seconds
    pub timeout_secs: u64,
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

impl TransportConfig {
    /// Create a config with default address, port and timeout.
    pub fn new(transport: TransportType) -> Self {
        Self {
            transport,
            address: crate::config::DEFAULT_SERVER_HOST.to_string(),
            port: crate::config::DEFAULT_SERVER_PORT,
            timeout_secs: crate::config::DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            options: HashMap::new(),
        }
    }

    /// Set the bind address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the graceful shutdown bound, in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set a transport-specific option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Get the graceful shutdown bound as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// String option, if present and a string.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }

    /// Unsigned integer option, if present and a non-negative integer.
    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(|v| v.as_u64())
    }
}

/// Registry of transport configurations.
#[derive(Debug, Default)]
pub struct TransportManager {
    transports: RwLock<HashMap<TransportType, TransportConfig>>,
}

impl TransportManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with one entry per transport type, built from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let transports = TransportType::ALL
            .into_iter()
            .map(|transport| (transport, Self::config_for(config, transport)))
            .collect();
        Self {
            transports: RwLock::new(transports),
        }
    }

    fn config_for(config: &AppConfig, transport: TransportType) -> TransportConfig {
        let base = TransportConfig::new(transport)
            .with_address(&config.server_host)
            .with_port(config.server_port)
            .with_timeout_secs(config.shutdown_timeout_secs);

        match transport {
            TransportType::Stdio => base,
            TransportType::Sse => base
                .with_option(OPTION_SSE_PATH, config.sse_path.clone())
                .with_option(OPTION_POST_PATH, config.post_path.clone())
                .with_option(OPTION_KEEP_ALIVE_SECS, config.sse_keep_alive_secs),
            TransportType::Http => base.with_option(OPTION_ENDPOINT, config.mcp_endpoint.clone()),
        }
    }

    /// Register a transport configuration, replacing any entry of the same type.
    ///
    /// Returns the replaced entry, if any.
    pub async fn register(&self, config: TransportConfig) -> Option<TransportConfig> {
        let transport = config.transport;
        let previous = {
            let mut transports = self.transports.write().await;
            transports.insert(transport, config)
        };
        debug!(
            transport = %transport,
            replaced = previous.is_some(),
            "Registered transport"
        );
        previous
    }

    /// Get the configuration of a transport type.
    pub async fn get(&self, transport: TransportType) -> Result<TransportConfig> {
        let transports = self.transports.read().await;
        transports
            .get(&transport)
            .cloned()
            .ok_or_else(|| TaskBridgeError::not_found(format!("transport not found: {}", transport)))
    }

    /// All registered transport types, in no particular order.
    pub async fn list(&self) -> Vec<TransportType> {
        let transports = self.transports.read().await;
        transports.keys().copied().collect()
    }

    /// Check whether a transport type is registered.
    pub async fn contains(&self, transport: TransportType) -> bool {
        let transports = self.transports.read().await;
        transports.contains_key(&transport)
    }

    /// Number of registered transports.
    pub async fn len(&self) -> usize {
        let transports = self.transports.read().await;
        transports.len()
    }

    /// Check whether no transport is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Validate a transport name against the supported set.
pub fn validate_transport_type(name: &str) -> Result<TransportType> {
    name.parse::<TransportType>().map_err(|e| match e {
        TaskBridgeError::InvalidArgument { .. } => TaskBridgeError::unsupported_transport(name),
        other => other,
    })
}
