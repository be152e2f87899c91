//! roberta-admin - Command line client for Open Roberta server administration.
//!
//! Sends the admin commands (update firmware, set token, set robot) to a
//! running server over JSON/HTTP.

mod admin;
mod cli;
mod comm;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use commands::{cmd_config, cmd_set_robot, cmd_set_token, cmd_update_firmware, effective_config};
use config::Overrides;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let overrides = Overrides {
        server: cli.server.clone(),
        timeout_secs: cli.timeout,
    };

    match cli.command {
        Commands::UpdateFirmware => {
            let config = effective_config(&overrides)?;
            cmd_update_firmware(&config, cli.json).await?;
        }
        Commands::SetToken { token } => {
            let config = effective_config(&overrides)?;
            cmd_set_token(&config, &token, cli.json).await?;
        }
        Commands::SetRobot { robot } => {
            let config = effective_config(&overrides)?;
            cmd_set_robot(&config, &robot, cli.json).await?;
        }
        Commands::Config { action } => {
            cmd_config(&overrides, action)?;
        }
    }

    Ok(())
}
