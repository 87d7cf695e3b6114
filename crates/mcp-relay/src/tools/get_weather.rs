//! Tool: get_weather — Report a canned weather lookup.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::types::{McpResult, ToolDefinition};

use super::ToolHandler;

pub const NAME: &str = "get_weather";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        description: "Get the current weather in a given location".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g. San Francisco, CA"
                }
            },
            "required": ["location"]
        }),
    }
}

pub struct GetWeather;

#[async_trait]
impl ToolHandler for GetWeather {
    async fn invoke(&self, arguments: Option<Value>) -> McpResult<Value> {
        let rendered = arguments.unwrap_or(Value::Null).to_string();
        Ok(json!({
            "status": "success",
            "output": format!("Successfully invoked {NAME} with parameters: {rendered}"),
        }))
    }
}
