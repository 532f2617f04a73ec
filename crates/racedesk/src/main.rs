// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! racedesk - booking and analytics assistant for a racing simulator club.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod chat;
mod runtime;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use racedesk_config::{ConfigError, RacedeskConfig};

/// racedesk - booking and analytics assistant for a racing simulator club.
#[derive(Parser, Debug)]
#[command(name = "racedesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the webhook gateway (default).
    Serve,
    /// Load and validate the configuration, then exit.
    CheckConfig,
    /// Talk to the assistant from the terminal.
    Chat {
        /// Use the admin analytics profile instead of the client one.
        #[arg(long)]
        admin: bool,
    },
}

fn load(path: Option<&PathBuf>) -> Result<RacedeskConfig, Vec<ConfigError>> {
    match path {
        Some(path) => racedesk_config::load_and_validate_path(path),
        None => racedesk_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            racedesk_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::CheckConfig => {
            println!(
                "racedesk: configuration OK (business.name={}, gateway={}:{})",
                config.business.name, config.gateway.bind_address, config.gateway.port
            );
            Ok(())
        }
        Commands::Chat { admin } => chat::run_chat(config, admin).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("racedesk: {e}");
            ExitCode::FAILURE
        }
    }
}
