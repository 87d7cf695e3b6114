//! The fixed descriptor answered to `initialize`.

use serde::{Deserialize, Serialize};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "mcp-relay";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Descriptor version reported by `initialize`, independent of the crate version.
pub const DESCRIPTOR_VERSION: &str = "0.1.0";

/// Name and version of either party, as carried in `serverInfo` / `clientInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// Capability flags for one catalog section. The relay never pushes list changes.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCapability {
    pub list_changed: bool,
}

/// Catalog sections the relay serves; all three are always advertised.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ServerCapabilities {
    pub prompts: SectionCapability,
    pub resources: SectionCapability,
    pub tools: SectionCapability,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub version: String,
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
}

impl InitializeResult {
    pub fn default_result() -> Self {
        Self {
            version: DESCRIPTOR_VERSION.to_string(),
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        }
    }
}
