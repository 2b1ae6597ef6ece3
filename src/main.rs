//! TaskBridge MCP - Main entry point.
//!
//! Exposes task management tools to AI assistants over the Model Context
//! Protocol, using stdio, SSE or Streamable HTTP.

use clap::Parser;
use std::process::ExitCode;
use taskbridge_mcp::cli::{self, Cli};
use taskbridge_mcp::config::AppConfig;
use taskbridge_mcp::info;
use taskbridge_mcp::logging::{self, LogRetention, LogSettings};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> taskbridge_mcp::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    let log_dir = if cli.no_log_file {
        None
    } else {
        cli.log_dir.clone().or_else(logging::default_log_dir)
    };
    let settings = LogSettings {
        level: cli
            .log_level
            .clone()
            .unwrap_or_else(|| config.log_level.clone()),
        verbose: cli.verbose,
        json: cli.json_logs,
        log_dir,
        retention: LogRetention::default(),
    };
    let log_path = logging::init_tracing(&settings)?;
    debug!(
        version = info::VERSION,
        build = %info::build_info(),
        log_file = ?log_path,
        "Logging initialized"
    );

    let result = cli::execute(&cli.command, config).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}
