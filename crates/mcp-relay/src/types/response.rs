//! Catalog entry types for tools, resources, and prompts.
//!
//! Catalogs are keyed by entry name, so the entries themselves carry no name.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDefinition {
    pub uri: String,
    pub description: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub description: String,
    pub template: String,
}
