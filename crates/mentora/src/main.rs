// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mentora - a personal coach backend with short- and long-term memory.
//!
//! This is the binary entry point for the Mentora service.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod seed;
mod serve;

/// Mentora - a personal coach backend.
#[derive(Parser, Debug)]
#[command(name = "mentora", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Mentora coach server.
    Serve,
    /// Load predefined knowledge from a JSON file into the vector store.
    Seed {
        /// Path to a JSON array of `{ "text": ..., "role"?: ... }` items.
        #[arg(long)]
        file: PathBuf,
        /// Drop the existing predefined collection before loading.
        #[arg(long)]
        recreate: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match mentora_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            mentora_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Seed { file, recreate }) => seed::run_seed(config, &file, recreate).await,
        None => {
            println!("mentora: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; the configured level is the fallback.
fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = mentora_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "mentora");
    }
}
