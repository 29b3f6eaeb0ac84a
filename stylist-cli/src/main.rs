//! stylist - command-line front end for the virtual stylist backend
//!
//! - `catalog` / `search` / `generate` drive a `StylistSession`
//! - `admin ...` talks to the `/admin` CRUD surface directly

mod admin;
mod cli;
mod commands;
mod logger;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before clap reads env fallbacks
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(&cli.log_level, cli.log_json) {
        eprintln!("failed to initialise logging: {e}");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.client_config();
    let json = cli.json;

    match cli.command {
        Command::Catalog => commands::catalog(&config, json).await,
        Command::Search { id } => commands::search(&config, &id, json).await,
        Command::Generate(args) => commands::generate(&config, args, json).await,
        Command::Admin { command } => admin::run(&config, command, json).await,
    }
}
