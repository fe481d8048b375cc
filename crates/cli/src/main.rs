mod config;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hass::{HassTools, TargetArgs, ToolOutcome, tool_definitions};
use mcp::{Server, ServerConfig};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const SERVER_NAME: &str = "hass-mcp";

#[derive(Parser)]
#[command(name = "hass-mcp")]
#[command(about = "Home Assistant tools over MCP", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ./hass-mcp.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the tools over MCP on stdin/stdout
    Serve,
    /// Show an entity's state
    State {
        /// Entity id, e.g. light.bedroom
        entity_id: String,
    },
    /// Apply an operation to an entity
    Set {
        /// Entity id, e.g. light.bedroom
        entity_id: String,
        /// Operation as JSON, e.g. '{"type":"brightness_value","input":50}'
        target: String,
    },
    /// Play media on a media player
    Play {
        /// Media player entity id
        entity_id: String,
        /// Album, track or artist name
        #[arg(default_value = hass::DEFAULT_MEDIA_CONTENT_ID)]
        media: String,
    },
    /// Print the tool definitions as JSON
    Tools,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Tools) = cli.command {
        return print_json(&tool_definitions());
    }

    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.logging.filter);
    let tools = config.tools()?;
    tracing::debug!(base_url = tools.client().base_url(), "config loaded");

    match cli.command {
        Some(Commands::Serve) | None => cmd_serve(tools).await,
        Some(Commands::State { entity_id }) => report(tools.get_state(&entity_id).await),
        Some(Commands::Set { entity_id, target }) => {
            let target: TargetArgs =
                serde_json::from_str(&target).map_err(|e| Error::InvalidTarget(e.to_string()))?;
            report(tools.set_state(&entity_id, &target).await)
        }
        Some(Commands::Play { entity_id, media }) => {
            report(tools.play_media(&entity_id, &media).await)
        }
        Some(Commands::Tools) => print_json(&tool_definitions()),
    }
}

async fn cmd_serve(tools: HassTools) -> Result<()> {
    let server = Server::new(
        ServerConfig {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        tools,
    );
    server.serve_stdio().await?;
    Ok(())
}

fn report(outcome: ToolOutcome) -> Result<()> {
    print_json(&outcome)?;
    if outcome.success {
        Ok(())
    } else {
        Err(Error::ToolFailed(outcome.message))
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Log to stderr; stdout carries the MCP protocol.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
