//! Tool registration and dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{McpError, McpResult};

use super::{get_user, get_weather};

/// A pluggable tool behind `tools/invoke`.
///
/// Handlers run on the shared runtime and must not block it.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, arguments: Option<Value>) -> McpResult<Value>;
}

/// Name-to-handler map consulted by `tools/invoke`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `get_weather` and `get_user`.
    pub fn builtin(lookup_delay: Duration) -> Self {
        let mut registry = Self::new();
        registry.register(get_weather::NAME, get_weather::GetWeather);
        registry.register(get_user::NAME, get_user::GetUser::new(lookup_delay));
        registry
    }

    pub fn register(&mut self, name: &str, handler: impl ToolHandler + 'static) {
        self.handlers.insert(name.to_string(), Arc::new(handler));
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub async fn invoke(&self, name: &str, arguments: Option<Value>) -> McpResult<Value> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;
        handler.invoke(arguments).await
    }
}
