//! Command line interface.
//!
//! `server` and `mcp` both start the MCP server; `server list`, `server info`
//! and `mcp transports` print transport information.

use crate::config::AppConfig;
use crate::error::Result;
use crate::info::{self, APP_NAME};
use crate::server::Server;
use crate::signal::spawn_signal_handler;
use crate::transport::{TransportType, validate_transport_type};
use clap::{Args, Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

const SEPARATOR: &str = "============================================================";

/// TaskBridge MCP - The unified bridge between task management systems and AI assistants.
#[derive(Debug, Parser)]
#[command(
    name = "taskbridge-mcp",
    version,
    long_version = info::LONG_VERSION.as_str(),
    arg_required_else_help = true,
    after_help = "Supported platforms: Microsoft To Do, Google Tasks, Todoist, Notion\n\n\
                  Examples:\n  \
                  taskbridge-mcp server start --transport http --port 8080\n  \
                  taskbridge-mcp server list"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Env file to load before the process environment (default: ./.env if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Verbose output: debug level with source locations
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Directory for log files (default: ~/.taskbridge-mcp/logs)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable writing a log file
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the MCP server
    #[command(subcommand)]
    Server(ServerCommands),

    /// Manage the MCP server (short form)
    #[command(subcommand)]
    Mcp(McpCommands),
}

/// `server` subcommands.
#[derive(Debug, Subcommand)]
pub enum ServerCommands {
    /// Start the MCP server
    ///
    /// Recommended: use Streaming HTTP (--transport http) for best performance.
    Start(ServerStartArgs),

    /// List available MCP transports
    List,

    /// Show MCP server information
    Info,
}

/// `mcp` subcommands.
#[derive(Debug, Subcommand)]
pub enum McpCommands {
    /// Start the MCP server
    Start(TransportArg),

    /// List available MCP transports
    Transports,
}

/// Transport selection shared by the start commands.
#[derive(Debug, Clone, Args)]
pub struct TransportArg {
    /// Transport type (stdio|sse|http)
    #[arg(long, default_value = "stdio")]
    pub transport: String,
}

/// Arguments of `server start`.
#[derive(Debug, Clone, Args)]
pub struct ServerStartArgs {
    #[command(flatten)]
    pub transport: TransportArg,

    /// Port for HTTP-based transports (sse, http); defaults to SERVER_PORT
    #[arg(long)]
    pub port: Option<u16>,
}

/// Execute a parsed command.
pub async fn execute(command: &Commands, config: AppConfig) -> Result<()> {
    match command {
        Commands::Server(ServerCommands::Start(args)) => {
            let transport = validate_transport_type(&args.transport.transport)?;
            let mut config = config;
            if let Some(port) = args.port {
                config.server_port = port;
            }
            eprint!("{}", render_start_banner(transport, config.server_port));
            run_server(config, transport).await
        }
        Commands::Server(ServerCommands::List) => {
            print!("{}", render_transport_list());
            Ok(())
        }
        Commands::Server(ServerCommands::Info) => {
            print!("{}", render_server_info(&config));
            Ok(())
        }
        Commands::Mcp(McpCommands::Start(args)) => {
            let transport = validate_transport_type(&args.transport)?;
            run_server(config, transport).await
        }
        Commands::Mcp(McpCommands::Transports) => {
            print!("{}", render_transport_summary());
            Ok(())
        }
    }
}

async fn run_server(config: AppConfig, transport: TransportType) -> Result<()> {
    info!(transport = %transport, "Starting MCP server");

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let server = Server::new(Arc::new(config), transport.as_str());
    info!(
        platforms = ?server.config().configured_platforms(),
        "Configured task platforms"
    );
    server.run(shutdown.clone()).await?;

    if transport == TransportType::Stdio && shutdown.is_cancelled() {
        // A blocking stdin read cannot be interrupted; leaving the runtime would hang on it.
        info!("Exiting process");
        std::process::exit(0);
    }

    Ok(())
}

/// Banner printed by `server start`.
pub fn render_start_banner(transport: TransportType, port: u16) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Starting MCP server with transport: {}", transport);
    let _ = writeln!(output, "Transport features: {}", transport.description());
    if transport.features().requires_http {
        let _ = writeln!(output, "Server will listen on port: {}", port);
    }
    output
}

/// Detailed transport listing printed by `server list`.
pub fn render_transport_list() -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Available MCP Transports:");
    let _ = writeln!(output, "{}", SEPARATOR);

    for transport in TransportType::ALL {
        let features = transport.features();
        let _ = writeln!(output);
        let _ = writeln!(output, "Transport: {} ({})", features.name, transport);
        let _ = writeln!(output, "  Description: {}", features.description);
        let _ = writeln!(output, "  Streaming: {}", features.is_streaming);
        let _ = writeln!(output, "  Requires HTTP: {}", features.requires_http);
        if let Some(port) = features.default_port {
            let _ = writeln!(output, "  Default Port: {}", port);
        }
        if !features.capabilities.is_empty() {
            let _ = writeln!(
                output,
                "  Capabilities: {}",
                features.capabilities.join(", ")
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{}", SEPARATOR);
    output
}

/// One line per transport, printed by `mcp transports`.
pub fn render_transport_summary() -> String {
    let mut output = String::from("Available MCP transports:\n");
    for transport in TransportType::ALL {
        let _ = writeln!(output, "  - {}: {}", transport, transport.description());
    }
    output
}

/// Overview printed by `server info`.
pub fn render_server_info(config: &AppConfig) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "MCP Server Information:");
    let _ = writeln!(output, "Multiple Transport Support Available:");
    let _ = writeln!(output);
    let _ = writeln!(output, "  1. Streaming HTTP (RECOMMENDED)");
    let _ = writeln!(output, "     - Streaming HTTP transport with session management");
    let _ = writeln!(output, "     - Best performance and community standard");
    let _ = writeln!(output);
    let _ = writeln!(output, "  2. Stdio");
    let _ = writeln!(output, "     - Direct CLI communication");
    let _ = writeln!(output, "     - Suitable for local development");
    let _ = writeln!(output);
    let _ = writeln!(output, "  3. Server-Sent Events (SSE)");
    let _ = writeln!(output, "     - Alternative streaming transport");
    let _ = writeln!(output, "     - Lower performance than Streaming HTTP");
    let _ = writeln!(output);

    let platforms = config.configured_platforms();
    if platforms.is_empty() {
        let _ = writeln!(output, "Configured platforms: none");
    } else {
        let _ = writeln!(output, "Configured platforms: {}", platforms.join(", "));
    }
    let _ = writeln!(output, "Build: {}", info::build_info());
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Run '{} server list' for detailed information",
        APP_NAME
    );
    let _ = writeln!(
        output,
        "Run '{} server start --transport http --port {}' to start with recommended transport",
        APP_NAME, config.server_port
    );
    output
}
