//! # apim CLI
//!
//! A command-line tool for importing and exporting API-management platform
//! configuration through the platform's REST management API.
//!
//! ## Quick Start
//!
//! ```bash
//! # Register a management API endpoint
//! apim config add
//!
//! # Snapshot an organization into a folder
//! apim export --org acme --folder ./snapshot
//!
//! # Replay a snapshot into another organization
//! apim import --org acme-staging --folder ./snapshot
//! ```
//!
//! Connection profiles live in `~/.config/apim/config.yaml`; credentials are
//! resolved from environment variables at run time.

use anyhow::Result;
use apim_cli::{commands, Cli};
use clap::Parser;

/// Parses command-line arguments and delegates to the matching command
/// handler. Any error is printed by the runtime and exits non-zero.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    commands::run(cmd, cli.profile).await
}
