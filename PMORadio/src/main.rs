//! PMORadio - find, resolve and play internet radio stations
//!
//! Subcommands:
//! - `PMORadio serve` - Run the MCP tool server on stdio (default)
//! - `PMORadio resolve <url>` - Resolve a station URL to a playable stream
//! - `PMORadio search <query>` - Search the Radio Browser directory
//! - `PMORadio probe` - Report GUI / VLC availability
//! - `PMORadio rc <command>...` - Send raw commands to a VLC RC interface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pmoconfig::Config;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod params;
mod server;

use server::RadioServer;

#[derive(Parser)]
#[command(name = "PMORadio")]
#[command(about = "Internet radio discovery and local playback, as MCP tools")]
#[command(version)]
struct Cli {
    /// Configuration directory (default: $PMORADIO_CONFIG, ./.pmoradio, ~/.pmoradio)
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP tool server over stdin/stdout
    Serve,

    /// Resolve a station URL to a directly playable stream
    Resolve {
        /// Station or stream URL
        url: String,
    },

    /// Search the Radio Browser directory
    Search {
        /// Station name
        query: String,

        /// Country filter
        #[arg(long)]
        country: Option<String>,

        /// Tag filter
        #[arg(long)]
        tag: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Report whether a GUI and VLC are available
    Probe,

    /// Send commands to a VLC RC interface
    Rc {
        /// RC host (default from config)
        #[arg(long)]
        host: Option<String>,

        /// RC port (default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Commands, one per argument (e.g. "volume 256" status)
        #[arg(required = true)]
        commands: Vec<String>,
    },
}

/// Log to stderr: stdout carries the MCP protocol. `RUST_LOG` wins over the
/// configured level.
fn init_logging(config: &Config) {
    let level = config
        .get_log_min_level()
        .unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(config: &Config) -> Result<()> {
    let server = RadioServer::from_config(config).await?;

    let service = server
        .serve(stdio())
        .await
        .context("Failed to start stdio MCP service")?;

    info!("📻 PMORadio MCP server running on stdio");
    service.waiting().await?;
    info!("PMORadio MCP server shutdown");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_config(cli.config_dir.as_deref().unwrap_or(""))
        .context("Failed to load configuration")?;
    init_logging(&config);

    if let Some(dir) = config.config_dir() {
        info!("Using configuration directory {}", dir.display());
    }
    match config.config_file() {
        Some(file) if file.exists() => info!("Loaded config file {}", file.display()),
        Some(file) => info!("No config file at {}, using embedded defaults", file.display()),
        None => {}
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Resolve { url } => commands::resolve(&config, &url).await,
        Commands::Search {
            query,
            country,
            tag,
            limit,
        } => commands::search(&config, query, country, tag, limit).await,
        Commands::Probe => commands::probe(&config),
        Commands::Rc {
            host,
            port,
            commands: list,
        } => commands::rc(&config, host, port, list).await,
    }
}
