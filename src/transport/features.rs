//! Static transport descriptions used by the CLI.

use super::TransportType;
use serde::Serialize;

const BASE_CAPABILITIES: &[&str] = &["tools", "resources", "prompts", "sampling"];
const STREAMING_CAPABILITIES: &[&str] = &["tools", "resources", "prompts", "sampling", "streaming"];

/// Describes the capabilities of a transport kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransportFeatures {
    pub name: &'static str,
    pub description: &'static str,
    pub is_streaming: bool,
    pub requires_http: bool,
    pub default_port: Option<u16>,
    pub capabilities: &'static [&'static str],
}

impl TransportFeatures {
    /// Placeholder record for names that are not a known transport.
    pub const UNKNOWN: TransportFeatures = TransportFeatures {
        name: "Unknown",
        description: "Unknown transport type",
        is_streaming: false,
        requires_http: false,
        default_port: None,
        capabilities: &[],
    };
}

impl TransportType {
    /// One-line description of the transport.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Stdio => "Standard input/output - Direct CLI communication",
            Self::Sse => "Server-Sent Events - Alternative HTTP streaming transport",
            Self::Http => {
                "Streaming HTTP (RECOMMENDED) - Best performance, MCP community standard"
            }
        }
    }

    /// Feature record of the transport.
    pub fn features(&self) -> TransportFeatures {
        match self {
            Self::Stdio => TransportFeatures {
                name: "Standard Input/Output",
                description: "Direct CLI communication using stdin/stdout",
                is_streaming: false,
                requires_http: false,
                default_port: None,
                capabilities: BASE_CAPABILITIES,
            },
            Self::Sse => TransportFeatures {
                name: "Server-Sent Events",
                description: "Alternative HTTP-based streaming communication",
                is_streaming: true,
                requires_http: true,
                default_port: Some(crate::config::DEFAULT_SERVER_PORT),
                capabilities: BASE_CAPABILITIES,
            },
            Self::Http => TransportFeatures {
                name: "Streaming HTTP (RECOMMENDED)",
                description: "Best performance streaming HTTP transport - MCP community standard",
                is_streaming: true,
                requires_http: true,
                default_port: Some(crate::config::DEFAULT_SERVER_PORT),
                capabilities: STREAMING_CAPABILITIES,
            },
        }
    }
}

/// Description for a transport name; unknown names get a placeholder.
pub fn describe(name: &str) -> &'static str {
    name.parse::<TransportType>()
        .map(|t| t.description())
        .unwrap_or("Unknown transport type")
}

/// Features for a transport name; unknown names get [`TransportFeatures::UNKNOWN`].
pub fn features_for(name: &str) -> TransportFeatures {
    name.parse::<TransportType>()
        .map(|t| t.features())
        .unwrap_or(TransportFeatures::UNKNOWN)
}
