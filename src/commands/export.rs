use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::client::{ApiClient, Session};
use crate::config::load_global_config;
use crate::exporter::{self, ExportOptions};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Organization name
    #[arg(short, long)]
    pub org: String,
    /// Folder to write the configuration snapshot into
    #[arg(short, long)]
    pub folder: PathBuf,
    /// Number of connections for bundle downloads
    #[arg(short = 'c', long = "conn", default_value_t = 4)]
    pub connections: usize,
}

pub async fn run(args: ExportArgs, profile: Option<&str>) -> Result<()> {
    let global = load_global_config()?;
    let profile = global.resolve_profile(profile)?;
    let mut session = Session::new(ApiClient::new(profile)?);

    let opts = ExportOptions {
        org: args.org,
        folder: args.folder,
        connections: args.connections,
    };
    exporter::run(&mut session, &opts).await
}
