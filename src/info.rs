//! Application identity and build metadata.
//!
//! Git metadata is injected at compile time through the
//! `TASKBRIDGE_GIT_COMMIT` and `TASKBRIDGE_BUILD_DATE` environment variables
//! and falls back to "unknown".

use std::sync::LazyLock;

/// Binary and server name reported to MCP clients.
pub const APP_NAME: &str = "taskbridge-mcp";
/// Human-readable server title.
pub const APP_TITLE: &str = "TaskBridge MCP";
/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit the binary was built from.
pub const GIT_COMMIT: &str = match option_env!("TASKBRIDGE_GIT_COMMIT") {
    Some(v) => v,
    None => "unknown",
};

/// Build timestamp.
pub const BUILD_DATE: &str = match option_env!("TASKBRIDGE_BUILD_DATE") {
    Some(v) => v,
    None => "unknown",
};

/// Formatted build information: `<version> <commit> <date> <os>/<arch>`.
pub fn build_info() -> String {
    format!(
        "{} {} {} {}/{}",
        VERSION,
        GIT_COMMIT,
        BUILD_DATE,
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// [`build_info`] computed once, for places that need a `&'static str`.
pub static LONG_VERSION: LazyLock<String> = LazyLock::new(build_info);
