//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::error::{Result, TaskBridgeError};
use crate::mcp::TaskService;
use crate::transport::{Transport, TransportContext};
use rmcp::ServiceExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport {
    service: TaskService,
}

impl StdioTransport {
    /// Create a new stdio transport serving the given service.
    pub fn new(service: TaskService) -> Self {
        Self { service }
    }

    /// Serve one MCP session over an arbitrary reader/writer pair.
    ///
    /// Returns when the peer closes the input, the session ends, or
    /// `ctx.shutdown` is cancelled.
    pub async fn serve_io<R, W>(&self, reader: R, writer: W, ctx: TransportContext) -> Result<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let service = self.service.clone();
        let running_service = tokio::select! {
            result = service.serve((reader, writer)) => result.map_err(|e| {
                TaskBridgeError::connection_failure(self.name(), format!("failed to start session: {}", e))
            })?,
            _ = ctx.shutdown.cancelled() => {
                info!("Shutdown requested before the stdio session was initialized");
                return Ok(());
            }
        };

        ctx.mark_running(None);
        info!("Stdio session initialized");

        let session_token = running_service.cancellation_token();
        let shutdown = ctx.shutdown.clone();
        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(quit_reason) => {
                        info!(reason = ?quit_reason, "Stdio transport completed normally");
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(TaskBridgeError::connection_failure(
                            self.name(),
                            e.to_string(),
                        ));
                    }
                }
            }
            _ = shutdown.cancelled() => {
                info!("Shutdown signal received, closing stdio session");
                session_token.cancel();
            }
        }

        info!("Stdio transport stopped");
        Ok(())
    }
}

impl Transport for StdioTransport {
    async fn run(&self, ctx: TransportContext) -> Result<()> {
        info!("Starting MCP server with stdio transport");
        self.serve_io(tokio::io::stdin(), tokio::io::stdout(), ctx)
            .await
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportType;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_stdio_transport_creation() {
        let transport = StdioTransport::new(TaskService::new());
        assert_eq!(transport.name(), "stdio");
    }

    #[tokio::test]
    async fn test_cancel_before_initialize_returns_ok() {
        let transport = StdioTransport::new(TaskService::new());
        let (_client, server) = tokio::io::duplex(1024);
        let (reader, writer) = tokio::io::split(server);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let ctx = TransportContext::detached(TransportType::Stdio, shutdown);
        assert!(transport.serve_io(reader, writer, ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_closed_input_before_initialize_is_connection_failure() {
        let transport = StdioTransport::new(TaskService::new());
        let (client, server) = tokio::io::duplex(1024);
        drop(client);
        let (reader, writer) = tokio::io::split(server);

        let ctx = TransportContext::detached(TransportType::Stdio, CancellationToken::new());
        let err = transport.serve_io(reader, writer, ctx).await.unwrap_err();
        assert!(matches!(err, TaskBridgeError::ConnectionFailure { .. }));
    }
}
