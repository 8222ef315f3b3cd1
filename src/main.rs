mod adapters;
mod bootstrap;
mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use ps_core::ports::AppDirsPort;
use ps_platform::app_dirs::DirsAppDirsAdapter;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve application directories")?;

    bootstrap::tracing::init_tracing_subscriber(Some(&dirs.logs_dir()))
        .context("Failed to initialize tracing")?;

    let config = bootstrap::resolve_config(cli.config.as_deref(), &dirs)?;
    let deps = bootstrap::wire_dependencies(&config, &dirs);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::wizard::run(&deps).await,
        Commands::Printers { command } => commands::printers::execute(&deps, command).await,
        Commands::Config { command } => commands::config::execute(&deps, command).await,
        Commands::RequestAccess => commands::printers::request_access(&deps).await,
    }
}
