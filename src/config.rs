//! Configuration handling for the TaskBridge MCP server.
//!
//! Configuration comes from an optional dotenv-style file followed by the
//! process environment. The resulting [`AppConfig`] is passed explicitly to
//! whoever needs it; there is no process-wide instance.

use std::path::Path;
use tracing::debug;

/// Default bind host (`SERVER_HOST`).
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
/// Default port (`SERVER_PORT`).
pub const DEFAULT_SERVER_PORT: u16 = 8080;
/// Default Streamable HTTP endpoint (`MCP_ENDPOINT`).
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
/// Default SSE stream path (`MCP_SSE_PATH`).
pub const DEFAULT_SSE_PATH: &str = "/sse";
/// Default SSE message path (`MCP_POST_PATH`).
pub const DEFAULT_POST_PATH: &str = "/message";
/// Default SSE keep-alive interval (`MCP_SSE_KEEP_ALIVE`).
pub const DEFAULT_SSE_KEEP_ALIVE_SECS: u64 = 15;
/// Default graceful shutdown bound (`SHUTDOWN_TIMEOUT`).
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
/// Default log level (`LOG_LEVEL`).
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Microsoft To Do credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MicrosoftConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

/// Google Tasks credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

/// Todoist credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoistConfig {
    pub api_key: Option<String>,
}

/// Notion credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotionConfig {
    pub integration_token: Option<String>,
    pub database_id: Option<String>,
}

/// Configuration for the TaskBridge MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Host the HTTP-based transports bind to
    pub server_host: String,
    /// Port the HTTP-based transports bind to
    pub server_port: u16,
    /// Streamable HTTP endpoint path
    pub mcp_endpoint: String,
    /// SSE stream path
    pub sse_path: String,
    /// SSE message POST path
    pub post_path: String,
    /// Interval between SSE keep-alive comments
    pub sse_keep_alive_secs: u64,
    /// How long open streams may drain after shutdown is requested
    pub shutdown_timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    pub microsoft: MicrosoftConfig,
    pub google: GoogleConfig,
    pub todoist: TodoistConfig,
    pub notion: NotionConfig,
}

impl AppConfig {
    /// Load configuration from an env file (if any) and the environment.
    ///
    /// With an explicit `env_file` the file must exist. Without one, a `.env`
    /// file in the working directory is used when present.
    pub fn load(env_file: Option<&Path>) -> crate::error::Result<Self> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path).map_err(|e| {
                    crate::error::TaskBridgeError::invalid_config(format!(
                        "failed to load {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                debug!(path = %path.display(), "Loaded env file");
            }
            None => {
                if dotenv::dotenv().is_err() {
                    debug!("No .env file found, using environment variables only");
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Self {
            server_host: get_or("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: get("SERVER_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            mcp_endpoint: get_or("MCP_ENDPOINT", DEFAULT_MCP_ENDPOINT),
            sse_path: get_or("MCP_SSE_PATH", DEFAULT_SSE_PATH),
            post_path: get_or("MCP_POST_PATH", DEFAULT_POST_PATH),
            sse_keep_alive_secs: get("MCP_SSE_KEEP_ALIVE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_SSE_KEEP_ALIVE_SECS),
            shutdown_timeout_secs: get("SHUTDOWN_TIMEOUT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            log_level: get_or("LOG_LEVEL", DEFAULT_LOG_LEVEL),

            microsoft: MicrosoftConfig {
                client_id: get("MICROSOFT_CLIENT_ID"),
                client_secret: get("MICROSOFT_CLIENT_SECRET"),
                access_token: get("MICROSOFT_ACCESS_TOKEN"),
            },
            google: GoogleConfig {
                client_id: get("GOOGLE_CLIENT_ID"),
                client_secret: get("GOOGLE_CLIENT_SECRET"),
                access_token: get("GOOGLE_ACCESS_TOKEN"),
            },
            todoist: TodoistConfig {
                api_key: get("TODOIST_API_KEY"),
            },
            notion: NotionConfig {
                integration_token: get("NOTION_INTEGRATION_TOKEN"),
                database_id: get("NOTION_DATABASE_ID"),
            },
        }
    }

    /// Names of the task platforms that have any credential configured.
    pub fn configured_platforms(&self) -> Vec<&'static str> {
        let mut platforms = Vec::new();
        if self.microsoft != MicrosoftConfig::default() {
            platforms.push("Microsoft To Do");
        }
        if self.google != GoogleConfig::default() {
            platforms.push("Google Tasks");
        }
        if self.todoist.api_key.is_some() {
            platforms.push("Todoist");
        }
        if self.notion != NotionConfig::default() {
            platforms.push("Notion");
        }
        platforms
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
