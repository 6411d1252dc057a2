//! Agora CLI
//!
//! Terminal front-end for the Agora social service. The session is stored under
//! `AGORA_DATA_DIR` (default `~/.agora`) so commands can be chained across invocations.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod auth_commands;
mod cli;
mod commands;
mod feed_commands;
mod profile_commands;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = commands::App::new(&cli)?;
    commands::dispatch(&app, cli.command).await
}
