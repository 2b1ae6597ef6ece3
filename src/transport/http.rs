//! HTTP transport with Streamable HTTP support for the MCP server.
//!
//! This transport uses HTTP with SSE streaming responses,
//! which is suitable for web-based MCP integrations.

use crate::error::Result;
use crate::mcp::TaskService;
use crate::transport::registry::OPTION_ENDPOINT;
use crate::transport::{Transport, TransportConfig, TransportContext, serve_router};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tracing::info;

/// HTTP transport implementation with Streamable HTTP support.
///
/// This transport provides:
/// - HTTP endpoints for MCP protocol messages
/// - Server-Sent Events for streaming responses
/// - Session management for stateful connections
pub struct HttpTransport {
    service: TaskService,
    config: TransportConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `service` - MCP service cloned into every session
    /// * `config` - Registered HTTP transport configuration (address, port, endpoint)
    pub fn new(service: TaskService, config: TransportConfig) -> Self {
        Self { service, config }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        self.config.bind_addr()
    }

    /// Get the MCP endpoint path.
    pub fn endpoint(&self) -> &str {
        self.config
            .option_str(OPTION_ENDPOINT)
            .unwrap_or(crate::config::DEFAULT_MCP_ENDPOINT)
    }

    fn router(&self) -> axum::Router {
        let service = self.service.clone();
        let mcp_service = StreamableHttpService::new(
            move || Ok(service.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service doesn't support root path "/", use fallback_service instead
        let endpoint = self.endpoint();
        if endpoint == "/" {
            axum::Router::new().fallback_service(mcp_service)
        } else {
            axum::Router::new().nest_service(endpoint, mcp_service)
        }
    }
}

impl Transport for HttpTransport {
    async fn run(&self, ctx: TransportContext) -> Result<()> {
        let app = self.router();
        info!(endpoint = %self.endpoint(), "MCP endpoint ready");
        serve_router(app, &self.config, &ctx, "HTTP").await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportType;

    fn transport_with(config: TransportConfig) -> HttpTransport {
        HttpTransport::new(TaskService::new(), config)
    }

    #[test]
    fn test_http_transport_creation() {
        let transport = transport_with(
            TransportConfig::new(TransportType::Http)
                .with_address("127.0.0.1")
                .with_port(8080),
        );
        assert_eq!(transport.name(), "http");
        assert_eq!(transport.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_http_transport_default_endpoint() {
        let transport = transport_with(TransportConfig::new(TransportType::Http));
        assert_eq!(transport.endpoint(), "/");
    }

    #[test]
    fn test_http_transport_custom_endpoint() {
        let transport = transport_with(
            TransportConfig::new(TransportType::Http).with_option(OPTION_ENDPOINT, "/custom/path"),
        );
        assert_eq!(transport.endpoint(), "/custom/path");
    }
}
