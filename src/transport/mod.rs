//! Transport layer for the MCP server.
//!
//! This module provides the transport implementations for the MCP protocol:
//! - Stdio: Standard input/output for CLI integration
//! - SSE: Legacy Server-Sent Events binding (GET stream + POST messages)
//! - HTTP: Streamable HTTP, the recommended MCP binding
//!
//! It also holds the transport registry and the static metadata shown by the
//! CLI.

pub mod features;
pub mod http;
pub mod registry;
pub mod sse;
pub mod stdio;

pub use features::{TransportFeatures, describe, features_for};
pub use http::HttpTransport;
pub use registry::{TransportConfig, TransportManager, validate_transport_type};
pub use sse::SseTransport;
pub use stdio::StdioTransport;

use crate::error::{Result, TaskBridgeError};
use crate::server::ServerState;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Transport type for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Standard input/output (for CLI integration)
    Stdio,
    /// Server-Sent Events (legacy HTTP streaming)
    Sse,
    /// Streamable HTTP
    Http,
}

impl TransportType {
    /// All transport types, in display order.
    pub const ALL: [TransportType; 3] = [Self::Stdio, Self::Sse, Self::Http];

    /// The identifier used on the command line and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
            Self::Http => "http",
        }
    }
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportType {
    type Err = TaskBridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Err(TaskBridgeError::invalid_argument(
                "transport type cannot be empty",
            ));
        }
        match name.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "sse" => Ok(Self::Sse),
            "http" => Ok(Self::Http),
            _ => Err(TaskBridgeError::unsupported_transport(name)),
        }
    }
}

/// Everything a transport needs from the server while it runs.
#[derive(Clone)]
pub struct TransportContext {
    /// Cancelled when the transport should shut down
    pub shutdown: CancellationToken,
    transport: TransportType,
    state: Arc<watch::Sender<ServerState>>,
}

impl TransportContext {
    pub(crate) fn new(
        transport: TransportType,
        shutdown: CancellationToken,
        state: Arc<watch::Sender<ServerState>>,
    ) -> Self {
        Self {
            shutdown,
            transport,
            state,
        }
    }

    /// Standalone context, for driving a transport without a [`crate::Server`].
    pub fn detached(transport: TransportType, shutdown: CancellationToken) -> Self {
        let (state, _) = watch::channel(ServerState::Connected(transport));
        Self::new(transport, shutdown, Arc::new(state))
    }

    /// Report that the transport is serving.
    pub fn mark_running(&self, local_addr: Option<SocketAddr>) {
        self.state.send_replace(ServerState::Running {
            transport: self.transport,
            local_addr,
        });
    }
}

/// Trait for MCP transport implementations.
///
/// Transports handle the low-level communication between the MCP server
/// and clients, abstracting away the protocol details.
pub trait Transport: Send + Sync {
    /// Start the transport and begin handling requests.
    ///
    /// This method should block until the transport is shut down.
    fn run(&self, ctx: TransportContext) -> impl Future<Output = Result<()>> + Send;

    /// Get the name of this transport for logging.
    fn name(&self) -> &'static str;
}

/// Bind `config.bind_addr()` and serve `app` until the context is cancelled.
///
/// Shared by the HTTP-based transports. After cancellation, open streams get
/// at most `config.timeout()` to close before the server is dropped.
pub(crate) async fn serve_router(
    app: Router,
    config: &TransportConfig,
    ctx: &TransportContext,
    transport_name: &str,
) -> Result<()> {
    let bind_addr = config.bind_addr();
    info!(
        "Starting MCP server with {} transport on {}",
        transport_name, bind_addr
    );

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| TaskBridgeError::listener_failure(&bind_addr, e.to_string()))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| TaskBridgeError::listener_failure(&bind_addr, e.to_string()))?;

    ctx.mark_running(Some(local_addr));
    info!(
        "{} transport listening on http://{}",
        transport_name, local_addr
    );

    let graceful_timeout = config.timeout();
    let shutdown = ctx.shutdown.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned());

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!(error = %e, "{} transport error", transport_name);
                return Err(TaskBridgeError::listener_failure(local_addr.to_string(), e.to_string()));
            }
        }
        _ = async {
            shutdown.cancelled().await;
            info!(
                timeout_secs = graceful_timeout.as_secs(),
                "Waiting for connections to close..."
            );
            tokio::time::sleep(graceful_timeout).await;
        } => {
            warn!("Graceful shutdown timeout, dropping open connections");
        }
    }

    info!("{} transport stopped", transport_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_transports() {
        assert_eq!("stdio".parse::<TransportType>().unwrap(), TransportType::Stdio);
        assert_eq!("SSE".parse::<TransportType>().unwrap(), TransportType::Sse);
        assert_eq!(" http ".parse::<TransportType>().unwrap(), TransportType::Http);
    }

    #[test]
    fn test_parse_empty_is_invalid_argument() {
        let err = "".parse::<TransportType>().unwrap_err();
        assert!(matches!(err, TaskBridgeError::InvalidArgument { .. }));
    }

    #[test]
    fn test_parse_unknown_is_unsupported() {
        for name in ["websocket", "grpc", "https", "std io"] {
            let err = name.parse::<TransportType>().unwrap_err();
            assert!(
                matches!(err, TaskBridgeError::UnsupportedTransport { .. }),
                "{name} should be unsupported"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for transport in TransportType::ALL {
            assert_eq!(
                transport.to_string().parse::<TransportType>().unwrap(),
                transport
            );
        }
    }

    #[test]
    fn test_detached_context_marks_running() {
        let ctx = TransportContext::detached(TransportType::Http, CancellationToken::new());
        let receiver = ctx.state.subscribe();
        ctx.mark_running(None);
        assert_eq!(
            *receiver.borrow(),
            ServerState::Running {
                transport: TransportType::Http,
                local_addr: None
            }
        );
    }
}
