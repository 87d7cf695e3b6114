//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit CLI value, then environment variable,
//! then built-in default.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::types::McpResult;

pub const ENV_ADDR: &str = "MCP_RELAY_ADDR";
pub const ENV_CATALOG: &str = "MCP_RELAY_CATALOG";
pub const ENV_HANDSHAKE_DELAY_MS: &str = "MCP_RELAY_HANDSHAKE_DELAY_MS";
pub const ENV_LOOKUP_DELAY_MS: &str = "MCP_RELAY_LOOKUP_DELAY_MS";
pub const ENV_SEND_TIMEOUT_MS: &str = "MCP_RELAY_SEND_TIMEOUT_MS";

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_HANDSHAKE_DELAY_MS: u64 = 100;
pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 50;
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 10_000;

/// Values given on the command line; `None` defers to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub catalog: Option<String>,
    pub handshake_delay_ms: Option<u64>,
    pub lookup_delay_ms: Option<u64>,
    pub send_timeout_ms: Option<u64>,
}

/// Fully resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub catalog_path: Option<PathBuf>,
    /// Pause between the `initialize` response and the `initialized` notification.
    pub handshake_delay: Duration,
    /// Simulated latency of the `get_user` lookup.
    pub lookup_delay: Duration,
    /// Socket writes slower than this count as failed deliveries.
    pub send_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            catalog_path: None,
            handshake_delay: Duration::from_millis(DEFAULT_HANDSHAKE_DELAY_MS),
            lookup_delay: Duration::from_millis(DEFAULT_LOOKUP_DELAY_MS),
            send_timeout: Duration::from_millis(DEFAULT_SEND_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self {
            addr: resolve_addr(overrides.addr.as_deref()),
            catalog_path: overrides
                .catalog
                .or_else(|| std::env::var(ENV_CATALOG).ok())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            handshake_delay: resolve_millis(
                overrides.handshake_delay_ms,
                ENV_HANDSHAKE_DELAY_MS,
                DEFAULT_HANDSHAKE_DELAY_MS,
            ),
            lookup_delay: resolve_millis(
                overrides.lookup_delay_ms,
                ENV_LOOKUP_DELAY_MS,
                DEFAULT_LOOKUP_DELAY_MS,
            ),
            send_timeout: resolve_millis(
                overrides.send_timeout_ms,
                ENV_SEND_TIMEOUT_MS,
                DEFAULT_SEND_TIMEOUT_MS,
            ),
        }
    }

    /// The configured catalog file, or the built-in catalog when none is set.
    pub fn load_catalog(&self) -> McpResult<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::from_file(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

/// Resolve the listen address.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    if let Ok(env_addr) = std::env::var(ENV_ADDR) {
        if !env_addr.is_empty() {
            return env_addr;
        }
    }

    DEFAULT_ADDR.to_string()
}

fn resolve_millis(explicit: Option<u64>, var: &str, default: u64) -> Duration {
    Duration::from_millis(pick_millis(explicit, std::env::var(var).ok(), var, default))
}

fn pick_millis(explicit: Option<u64>, env_value: Option<String>, var: &str, default: u64) -> u64 {
    if let Some(ms) = explicit {
        return ms;
    }

    match env_value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring {var}={raw:?}: not a whole number of milliseconds");
            default
        }),
        None => default,
    }
}
