// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qissa - a chat generation backend.
//!
//! This is the binary entry point for the Qissa service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Qissa - a chat generation backend.
#[derive(Parser, Debug)]
#[command(name = "qissa", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Qissa HTTP service.
    Serve,
    /// Load the configuration, validate it, and exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match qissa_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            qissa_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!(
                "qissa: config ok (service {}:{})",
                config.service.host, config.service.port
            );
        }
        None => {
            println!("qissa: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = qissa_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.service.port, 3000);
    }
}
