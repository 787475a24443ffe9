use anyhow::Result;
use clap::Subcommand;

pub mod completions;
pub mod config;
pub mod export;
pub mod import;
pub mod keys;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Import a configuration snapshot folder into an organization")]
    Import(import::ImportArgs),
    #[command(about = "Export an organization's configuration into a snapshot folder")]
    Export(export::ExportArgs),
    #[command(about = "Manage connection profiles (list/add/remove/default)")]
    Config {
        #[command(subcommand)]
        cmd: config::ConfigCommands,
    },
    #[command(about = "Generate signing keys for the external-authorization sidecar")]
    Keys {
        #[command(subcommand)]
        cmd: keys::KeysCommands,
    },
    #[command(about = "Emit shell completion scripts (bash/zsh/fish)")]
    Completions { shell: String },
}

pub async fn run(cmd: Commands, profile: Option<String>) -> Result<()> {
    match cmd {
        Commands::Import(args) => import::run(args, profile.as_deref()).await,
        Commands::Export(args) => export::run(args, profile.as_deref()).await,
        Commands::Config { cmd } => config::run(cmd).await,
        Commands::Keys { cmd } => keys::run(cmd),
        Commands::Completions { shell } => completions::run(shell),
    }
}
