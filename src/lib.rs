//! TaskBridge MCP Library
//!
//! This library provides an MCP (Model Context Protocol) server that exposes
//! task management tools to AI assistants over stdio, SSE or Streamable HTTP.

pub mod cli;
pub mod config;
pub mod error;
pub mod info;
pub mod logging;
pub mod mcp;
pub mod server;
pub mod signal;
pub mod tools;
pub mod transport;

pub use config::AppConfig;
pub use error::{Result, TaskBridgeError};
pub use mcp::TaskService;
pub use server::{Server, ServerState};
pub use transport::TransportType;
