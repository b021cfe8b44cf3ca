// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jobwatch - WhatsApp jobcard notification bot.
//!
//! This is the binary entry point for the Jobwatch bot.

use clap::{Parser, Subcommand};

mod serve;

/// Jobwatch - WhatsApp jobcard notification bot.
#[derive(Parser, Debug)]
#[command(name = "jobwatch", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot: webhook server plus the conversation loop.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match jobwatch_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            jobwatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if serve::run_serve(config).await.is_err() {
                std::process::exit(1);
            }
        }
        None => {
            println!("jobwatch: use --help for available commands");
        }
    }
}
