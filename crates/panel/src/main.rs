//! Atrium Panel
//!
//! HTTP server and maintenance commands for the admin panel.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use atrium_panel::resource::ResourceCatalog;
use atrium_panel::{AppState, Config, cli, routes};

#[derive(Debug, Parser)]
#[command(name = "atrium", version, about = "Atrium admin panel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Copy the built assets into the public web root.
    Publish {
        /// Overwrite assets that were already published.
        #[arg(long)]
        force: bool,
    },
    /// List discovered resources.
    Resources,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Publish { force } => cli::cmd_publish(&config, force),
        Command::Resources => cli::cmd_resources(&config),
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting Atrium panel");

    let port = config.port;
    let state = AppState::new(config, ResourceCatalog::new())
        .context("failed to initialize application state")?;

    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
