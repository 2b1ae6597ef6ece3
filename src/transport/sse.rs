//! Legacy Server-Sent Events transport for the MCP server.
//!
//! Clients open `GET <sse_path>` and receive an `endpoint` event naming the
//! URL to POST their JSON-RPC messages to (`<post_path>?sessionId=<id>`).
//! Server messages flow back as `message` events on the open stream. Each
//! stream is one MCP session with its own clone of the service.

use crate::error::{Result, TaskBridgeError};
use crate::mcp::TaskService;
use crate::transport::registry::{OPTION_KEEP_ALIVE_SECS, OPTION_POST_PATH, OPTION_SSE_PATH};
use crate::transport::{Transport, TransportConfig, TransportContext, serve_router};
use axum::{Json, Router};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use axum::routing::{get, post};
use futures::channel::mpsc;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use rmcp::ServiceExt;
use rmcp::model::{ClientJsonRpcMessage, ServerJsonRpcMessage};
use serde::Deserialize;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

type SessionSenders = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<ClientJsonRpcMessage>>>>;

/// SSE transport implementation.
pub struct SseTransport {
    service: TaskService,
    config: TransportConfig,
}

#[derive(Clone)]
struct SseState {
    service: TaskService,
    sessions: SessionSenders,
    post_path: String,
    keep_alive: Duration,
    shutdown: CancellationToken,
}

#[derive(Debug, Deserialize)]
struct PostQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

impl SseTransport {
    /// Create a new SSE transport.
    ///
    /// # Arguments
    ///
    /// * `service` - MCP service cloned into every session
    /// * `config` - Registered SSE transport configuration (address, port, paths)
    pub fn new(service: TaskService, config: TransportConfig) -> Self {
        Self { service, config }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        self.config.bind_addr()
    }

    /// Path of the event stream endpoint.
    pub fn sse_path(&self) -> &str {
        self.config
            .option_str(OPTION_SSE_PATH)
            .unwrap_or(crate::config::DEFAULT_SSE_PATH)
    }

    /// Path clients POST their messages to.
    pub fn post_path(&self) -> &str {
        self.config
            .option_str(OPTION_POST_PATH)
            .unwrap_or(crate::config::DEFAULT_POST_PATH)
    }

    /// Interval between keep-alive comments on open streams.
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(
            self.config
                .option_u64(OPTION_KEEP_ALIVE_SECS)
                .unwrap_or(crate::config::DEFAULT_SSE_KEEP_ALIVE_SECS),
        )
    }

    /// Check the configured paths before any socket is bound.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [("sse_path", self.sse_path()), ("post_path", self.post_path())] {
            if !path.starts_with('/') {
                return Err(TaskBridgeError::invalid_config(format!(
                    "{} must start with '/', got '{}'",
                    name, path
                )));
            }
        }
        if self.sse_path() == self.post_path() {
            return Err(TaskBridgeError::invalid_config(
                "sse_path and post_path must differ",
            ));
        }
        if self.keep_alive().is_zero() {
            return Err(TaskBridgeError::invalid_config(
                "keep_alive_secs must be greater than 0",
            ));
        }
        Ok(())
    }

    fn router(&self, shutdown: CancellationToken) -> Router {
        let state = SseState {
            service: self.service.clone(),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            post_path: self.post_path().to_string(),
            keep_alive: self.keep_alive(),
            shutdown,
        };

        Router::new()
            .route(self.sse_path(), get(sse_handler))
            .route(self.post_path(), post(post_handler))
            .with_state(state)
    }
}

impl Transport for SseTransport {
    async fn run(&self, ctx: TransportContext) -> Result<()> {
        self.validate()?;
        let app = self.router(ctx.shutdown.clone());
        info!(
            sse_path = %self.sse_path(),
            post_path = %self.post_path(),
            "SSE endpoints ready"
        );
        serve_router(app, &self.config, &ctx, "SSE").await
    }

    fn name(&self) -> &'static str {
        "sse"
    }
}

/// Event stream that ends its session when the client goes away.
struct SessionStream {
    inner: BoxStream<'static, std::result::Result<Event, axum::Error>>,
    _guard: DropGuard,
}

impl Stream for SessionStream {
    type Item = std::result::Result<Event, axum::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}

async fn sse_handler(State(state): State<SseState>) -> Sse<KeepAliveStream<SessionStream>> {
    let session_id = Uuid::new_v4().to_string();
    let (client_tx, client_rx) = mpsc::unbounded::<ClientJsonRpcMessage>();
    let (server_tx, server_rx) = mpsc::unbounded::<ServerJsonRpcMessage>();

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), client_tx);
    }

    let session_token = state.shutdown.child_token();
    tokio::spawn(run_session(
        state.clone(),
        session_id.clone(),
        server_tx,
        client_rx,
        session_token.clone(),
    ));
    info!(session_id = %session_id, "SSE session opened");

    let endpoint = format!("{}?sessionId={}", state.post_path, session_id);
    let messages =
        server_rx.map(|message| Event::default().event("message").json_data(&message));
    let inner = stream::once(async move { Ok(Event::default().event("endpoint").data(endpoint)) })
        .chain(messages)
        .boxed();

    Sse::new(SessionStream {
        inner,
        _guard: session_token.drop_guard(),
    })
    .keep_alive(KeepAlive::new().interval(state.keep_alive))
}

async fn post_handler(
    State(state): State<SseState>,
    Query(query): Query<PostQuery>,
    Json(message): Json<ClientJsonRpcMessage>,
) -> StatusCode {
    let sender = {
        let sessions = state.sessions.read().await;
        sessions.get(&query.session_id).cloned()
    };

    match sender {
        Some(sender) => {
            if sender.unbounded_send(message).is_err() {
                debug!(session_id = %query.session_id, "Message for closed SSE session");
                StatusCode::GONE
            } else {
                StatusCode::ACCEPTED
            }
        }
        None => {
            debug!(session_id = %query.session_id, "Message for unknown SSE session");
            StatusCode::NOT_FOUND
        }
    }
}

async fn run_session(
    state: SseState,
    session_id: String,
    server_tx: mpsc::UnboundedSender<ServerJsonRpcMessage>,
    client_rx: mpsc::UnboundedReceiver<ClientJsonRpcMessage>,
    token: CancellationToken,
) {
    let service = state.service.clone();
    let initialized = tokio::select! {
        result = service.serve((server_tx, client_rx)) => Some(result),
        _ = token.cancelled() => None,
    };

    match initialized {
        Some(Ok(running_service)) => {
            let service_token = running_service.cancellation_token();
            tokio::select! {
                result = running_service.waiting() => {
                    debug!(session_id = %session_id, result = ?result, "SSE session finished");
                }
                _ = token.cancelled() => {
                    service_token.cancel();
                }
            }
        }
        Some(Err(e)) => {
            warn!(session_id = %session_id, error = %e, "SSE session failed to initialize");
        }
        None => {}
    }

    let mut sessions = state.sessions.write().await;
    sessions.remove(&session_id);
    info!(session_id = %session_id, "SSE session closed");
}
