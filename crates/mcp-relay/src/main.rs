//! mcp-relay — entry point.

use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use mcp_relay::catalog::Catalog;
use mcp_relay::config::{ConfigOverrides, ServerConfig};
use mcp_relay::protocol::{ProtocolHandler, Relay};
use mcp_relay::tools::ToolRegistry;
use mcp_relay::transport::HttpTransport;
use relay_hub::SinkRegistry;

#[derive(Parser)]
#[command(
    name = "mcp-relay",
    about = "Broadcast MCP front-end — every reply goes to every connected client",
    version
)]
struct Cli {
    /// Path to a JSON catalog of tools, resources and prompts. Also reads MCP_RELAY_CATALOG.
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve WebSocket, SSE and POST transports (default).
    Serve {
        /// Listen address (host:port). Also reads MCP_RELAY_ADDR.
        #[arg(long)]
        addr: Option<String>,

        /// Pause between the initialize response and the initialized notification.
        #[arg(long)]
        handshake_delay_ms: Option<u64>,

        /// Simulated latency of the get_user tool.
        #[arg(long)]
        lookup_delay_ms: Option<u64>,

        /// Socket writes slower than this drop the socket.
        #[arg(long)]
        send_timeout_ms: Option<u64>,
    },

    /// Print the initialize descriptor and catalog summary as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   mcp-relay completions bash > ~/.local/share/bash-completion/completions/mcp-relay
    ///   mcp-relay completions zsh > ~/.zfunc/_mcp-relay
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve {
        addr: None,
        handshake_delay_ms: None,
        lookup_delay_ms: None,
        send_timeout_ms: None,
    }) {
        Commands::Serve {
            addr,
            handshake_delay_ms,
            lookup_delay_ms,
            send_timeout_ms,
        } => {
            let config = ServerConfig::resolve(ConfigOverrides {
                addr,
                catalog: cli.catalog,
                handshake_delay_ms,
                lookup_delay_ms,
                send_timeout_ms,
            });
            tracing::info!("mcp-relay {}", env!("CARGO_PKG_VERSION"));
            tracing::debug!("Config: {config:?}");

            let catalog = config.load_catalog()?;
            let tools = ToolRegistry::builtin(config.lookup_delay);
            tracing::info!("Tools: {}", tools.names().join(", "));

            let handler =
                ProtocolHandler::new(catalog, tools).with_handshake_delay(config.handshake_delay);
            let relay = Relay::new(handler, Arc::new(SinkRegistry::new()));
            let transport = HttpTransport::with_send_timeout(relay, config.send_timeout);

            transport.run(&config.addr, shutdown_signal()).await?;
        }

        Commands::Info => {
            let config = ServerConfig::resolve(ConfigOverrides {
                catalog: cli.catalog,
                ..ConfigOverrides::default()
            });
            let catalog = config.load_catalog()?;
            let descriptor = mcp_relay::types::InitializeResult::default_result();
            let tools = ToolRegistry::builtin(Duration::ZERO);
            let info = serde_json::json!({
                "initialize": descriptor,
                "invokable_tools": tools.names(),
                "catalog": {
                    "tools": Catalog::names(&catalog.tools),
                    "resources": Catalog::names(&catalog.resources),
                    "prompts": Catalog::names(&catalog.prompts),
                },
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "mcp-relay", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
