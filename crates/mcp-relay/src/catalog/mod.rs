//! Read-only catalogs of declared tools, resources, and prompts.
//!
//! List methods return each section verbatim. The schema of the entries belongs
//! to whoever supplies the catalog; the built-in one mirrors the demo handlers.

pub mod prompts;
pub mod resources;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::{get_user, get_weather};
use crate::types::{McpError, McpResult};

/// The three static catalogs served by `tools/list`, `resources/list` and `prompts/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "empty_section")]
    pub tools: Value,
    #[serde(default = "empty_section")]
    pub resources: Value,
    #[serde(default = "empty_section")]
    pub prompts: Value,
}

fn empty_section() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Catalog {
    /// Catalog describing the built-in tools plus one sample resource and prompt.
    pub fn builtin() -> Self {
        let tools = BTreeMap::from([
            (get_weather::NAME, get_weather::definition()),
            (get_user::NAME, get_user::definition()),
        ]);

        Self {
            tools: serde_json::to_value(tools).unwrap_or_else(|_| empty_section()),
            resources: serde_json::to_value(resources::builtin())
                .unwrap_or_else(|_| empty_section()),
            prompts: serde_json::to_value(prompts::builtin()).unwrap_or_else(|_| empty_section()),
        }
    }

    /// Load a catalog from a JSON file with optional `tools`, `resources` and `prompts` keys.
    pub fn from_file(path: &Path) -> McpResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            McpError::Catalog(format!("Failed to read catalog {}: {e}", path.display()))
        })?;
        let catalog: Catalog = serde_json::from_str(&text).map_err(|e| {
            McpError::Catalog(format!("Failed to parse catalog {}: {e}", path.display()))
        })?;
        tracing::info!(
            "Loaded catalog from {}: {} tools, {} resources, {} prompts",
            path.display(),
            section_len(&catalog.tools),
            section_len(&catalog.resources),
            section_len(&catalog.prompts)
        );
        Ok(catalog)
    }

    /// Entry names of a section, for summaries.
    pub fn names(section: &Value) -> Vec<&str> {
        match section {
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn section_len(section: &Value) -> usize {
    match section {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_builtin_sections() {
        let catalog = Catalog::builtin();
        assert_eq!(Catalog::names(&catalog.tools), vec!["get_user", "get_weather"]);
        assert_eq!(
            catalog.tools["get_user"]["inputSchema"]["required"],
            json!(["user_id"])
        );
        assert_eq!(catalog.resources["user_data"]["uri"], "file:///etc/passwd");
        assert_eq!(catalog.resources["user_data"]["type"], "text/plain");
        assert_eq!(
            catalog.prompts["summarize_text"]["template"],
            "Please summarize the following text: {text}"
        );
    }

    #[test]
    fn test_file_catalog_is_kept_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tools": [{{"name": "scan", "x": 1}}], "prompts": {{"p": 2}}}}"#).unwrap();

        let catalog = Catalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.tools, json!([{"name": "scan", "x": 1}]));
        assert_eq!(catalog.resources, json!({}));
        assert_eq!(catalog.prompts, json!({"p": 2}));
        assert_eq!(Catalog::names(&catalog.tools), vec!["scan"]);
    }

    #[test]
    fn test_missing_file_is_a_catalog_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, McpError::Catalog(_)));
    }
}
