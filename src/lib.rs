//! # apim CLI Library
//!
//! Core library for the `apim` command-line tool: import and export of
//! API-management platform configuration through the management REST API.

use clap::Parser;

pub mod bundle;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod entities;
pub mod exporter;
pub mod folder;
pub mod importer;
pub mod jwks;

/// CLI tool for importing and exporting API-management configuration
///
/// Replays a local configuration snapshot (proxies, shared flows, products,
/// developers, apps, environment groups, and per-environment resources)
/// against an organization, or snapshots a live organization back into the
/// same folder layout.
#[derive(Parser)]
#[command(
    name = "apim",
    version,
    about = "CLI tool for importing and exporting API-management platform configuration"
)]
pub struct Cli {
    /// Connection profile to use (defaults to the configured default profile)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}
