// farmgate-cli/src/main.rs
// ============================================================================
// Module: Farmgate CLI Entry Point
// Description: Command dispatcher for the Farmgate portal server.
// Purpose: Load configuration and run the HTTP server.
// Dependencies: clap, farmgate-config, farmgate-server, tokio
// ============================================================================

//! ## Overview
//! The CLI loads the TOML configuration, validates it, and serves the portal
//! on a multi-thread runtime. Failures print one line to stderr and exit
//! non-zero; the server itself reports structured events through its monitor
//! sinks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use farmgate_config::FarmgateConfig;
use farmgate_server::FarmgateServer;

// ============================================================================
// SECTION: CLI Model
// ============================================================================

/// Farmgate portal command-line interface.
#[derive(Debug, Parser)]
#[command(name = "farmgate", about = "Farm-monitoring portal access gateway")]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the portal server.
    Serve {
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            config,
        } => serve(config.as_deref()),
    }
}

/// Runs the serve command and maps failures onto the exit code.
fn serve(config_path: Option<&Path>) -> ExitCode {
    match run_server(config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            #[allow(clippy::print_stderr, reason = "CLI failures report to stderr.")]
            {
                eprintln!("farmgate: {message}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration and serves until the process stops.
fn run_server(config_path: Option<&Path>) -> Result<(), String> {
    let config = FarmgateConfig::load(config_path).map_err(|err| err.to_string())?;
    let server = FarmgateServer::from_config(config).map_err(|err| err.to_string())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| err.to_string())?;
    runtime.block_on(server.serve()).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions."
    )]

    use clap::Parser;

    use super::Cli;
    use super::Command;

    #[test]
    fn serve_accepts_a_config_path() {
        let cli = Cli::parse_from(["farmgate", "serve", "--config", "portal.toml"]);
        let Command::Serve {
            config,
        } = cli.command;
        assert_eq!(config.as_deref().map(|path| path.to_str()), Some(Some("portal.toml")));
    }

    #[test]
    fn serve_defaults_to_no_config_path() {
        let cli = Cli::parse_from(["farmgate", "serve"]);
        let Command::Serve {
            config,
        } = cli.command;
        assert!(config.is_none());
    }
}
