//! MCP server lifecycle.
//!
//! A [`Server`] owns the shared [`TaskService`], a configuration snapshot,
//! the transport registry and the name of the transport it was asked to run.
//! It moves through `Created -> Connected -> Running -> Stopped` exactly once.

use crate::config::AppConfig;
use crate::error::{Result, TaskBridgeError};
use crate::mcp::TaskService;
use crate::transport::{
    HttpTransport, SseTransport, StdioTransport, Transport, TransportContext, TransportManager,
    TransportType, validate_transport_type,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Lifecycle state of a [`Server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Service built and tools registered; no transport attached yet
    Created,
    /// Transport chosen and being set up
    Connected(TransportType),
    /// Transport serving; `local_addr` is set for HTTP-based transports
    Running {
        transport: TransportType,
        local_addr: Option<SocketAddr>,
    },
    /// Terminal state
    Stopped,
}

/// An MCP server bound to one transport for its whole life.
pub struct Server {
    service: TaskService,
    config: Arc<AppConfig>,
    registry: Arc<TransportManager>,
    transport: String,
    state: Arc<watch::Sender<ServerState>>,
}

impl Server {
    /// Create a server whose transport registry is seeded from `config`.
    ///
    /// The transport name is only checked when [`Server::run`] is called.
    pub fn new(config: Arc<AppConfig>, transport: impl Into<String>) -> Self {
        let registry = Arc::new(TransportManager::from_config(&config));
        Self::with_registry(config, registry, transport)
    }

    /// Create a server using an existing transport registry.
    pub fn with_registry(
        config: Arc<AppConfig>,
        registry: Arc<TransportManager>,
        transport: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(ServerState::Created);
        Self {
            service: TaskService::new(),
            config,
            registry,
            transport: transport.into(),
            state: Arc::new(state),
        }
    }

    /// The transport name this server was created with.
    pub fn transport_name(&self) -> &str {
        &self.transport
    }

    /// The shared MCP service.
    pub fn service(&self) -> &TaskService {
        &self.service
    }

    /// Configuration snapshot the server was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Watch lifecycle state changes.
    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Run the server on its transport until it stops or `shutdown` is cancelled.
    ///
    /// An unsupported transport name fails before anything is allocated and
    /// leaves the server in `Created`. Otherwise the server ends `Stopped`
    /// whatever the outcome, and cannot be run again.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let transport = validate_transport_type(&self.transport)?;

        let started = self.state.send_if_modified(|state| {
            if *state == ServerState::Created {
                *state = ServerState::Connected(transport);
                true
            } else {
                false
            }
        });
        if !started {
            return Err(TaskBridgeError::AlreadyStarted);
        }

        let result = self.dispatch(transport, shutdown).await;
        if let Err(e) = &result {
            error!(transport = %transport, error = %e, "Server error");
        }

        self.state.send_replace(ServerState::Stopped);
        info!(transport = %transport, "Server stopped");
        result
    }

    async fn dispatch(&self, transport: TransportType, shutdown: CancellationToken) -> Result<()> {
        let config = self.registry.get(transport).await.map_err(|e| {
            TaskBridgeError::invalid_config(format!("no configuration for transport: {}", e))
        })?;
        let ctx = TransportContext::new(transport, shutdown, self.state.clone());

        info!(transport = %transport, "Starting MCP server");
        match transport {
            TransportType::Stdio => StdioTransport::new(self.service.clone()).run(ctx).await,
            TransportType::Sse => {
                SseTransport::new(self.service.clone(), config)
                    .run(ctx)
                    .await
            }
            TransportType::Http => {
                HttpTransport::new(self.service.clone(), config)
                    .run(ctx)
                    .await
            }
        }
    }
}
