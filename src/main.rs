use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod broker;
mod commands;
mod config;
mod db;
mod error;
mod models;
mod worker;

use config::Config;

/// Store pastes received from a RabbitMQ queue in PostgreSQL.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the settings file.
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Consume the paste queue (default).
    Listen,
    /// Create the pastes table.
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config).with_context(|| {
        format!(
            "failed to load config file '{path}'",
            path = cli.config.display()
        )
    })?;

    match cli.command.unwrap_or(Command::Listen) {
        Command::Listen => commands::listen::run(config).await,
        Command::InitDb => commands::init_db::run(config).await,
    }
}
