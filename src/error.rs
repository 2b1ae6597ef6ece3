//! Error types for the TaskBridge MCP server.
//!
//! This module defines all error types using `thiserror`. Every error is
//! surfaced to the caller (ultimately the CLI) and none are retried.

use thiserror::Error;

/// Errors raised by the server, its transports and its tools.
#[derive(Error, Debug)]
pub enum TaskBridgeError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("unsupported transport type: {transport} (supported: stdio, sse, http)")]
    UnsupportedTransport { transport: String },

    #[error("Connection failed on {transport} transport: {message}")]
    ConnectionFailure { transport: String, message: String },

    #[error("Listener failed on {address}: {message}")]
    ListenerFailure { address: String, message: String },

    #[error("Server has already been started and cannot be restarted")]
    AlreadyStarted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaskBridgeError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unsupported transport error.
    pub fn unsupported_transport(transport: impl Into<String>) -> Self {
        Self::UnsupportedTransport {
            transport: transport.into(),
        }
    }

    /// Create a connection failure error.
    pub fn connection_failure(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionFailure {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create a listener failure error.
    pub fn listener_failure(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ListenerFailure {
            address: address.into(),
            message: message.into(),
        }
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, TaskBridgeError>;

/// Convert TaskBridgeError to MCP ErrorData for tool call failures.
impl From<TaskBridgeError> for rmcp::ErrorData {
    fn from(err: TaskBridgeError) -> Self {
        match &err {
            TaskBridgeError::InvalidArgument { .. }
            | TaskBridgeError::UnsupportedTransport { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }
            TaskBridgeError::NotFound { .. } => {
                rmcp::ErrorData::resource_not_found(err.to_string(), None)
            }
            _ => rmcp::ErrorData::internal_error(err.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_transport_display_lists_supported() {
        let err = TaskBridgeError::unsupported_transport("websocket");
        assert_eq!(
            err.to_string(),
            "unsupported transport type: websocket (supported: stdio, sse, http)"
        );
    }

    #[test]
    fn test_listener_failure_display() {
        let err = TaskBridgeError::listener_failure("127.0.0.1:8080", "address in use");
        assert!(err.to_string().contains("127.0.0.1:8080"));
        assert!(err.to_string().contains("address in use"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TaskBridgeError = io.into();
        assert!(matches!(err, TaskBridgeError::Io(_)));
    }

    #[test]
    fn test_invalid_argument_maps_to_invalid_params() {
        let err = TaskBridgeError::invalid_argument("task_id is required");
        let mcp_err: rmcp::ErrorData = err.into();
        // invalid_params uses -32602
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let err = TaskBridgeError::not_found("transport not found: sse");
        let mcp_err: rmcp::ErrorData = err.into();
        // resource_not_found uses -32002 in rmcp
        assert_eq!(mcp_err.code.0, -32002);
    }

    #[test]
    fn test_listener_failure_maps_to_internal_error() {
        let err = TaskBridgeError::listener_failure("0.0.0.0:1", "denied");
        let mcp_err: rmcp::ErrorData = err.into();
        // internal_error uses -32603
        assert_eq!(mcp_err.code.0, -32603);
    }
}
