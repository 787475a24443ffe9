use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::client::{ApiClient, Session};
use crate::config::load_global_config;
use crate::importer::{self, Capability, ImportOptions};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Organization name
    #[arg(short, long)]
    pub org: String,
    /// Folder containing the configuration snapshot
    #[arg(short, long)]
    pub folder: PathBuf,
    /// Number of connections for bundle uploads
    #[arg(short = 'c', long = "conn", default_value_t = 4)]
    pub connections: usize,
    /// Import distributed trace configuration
    #[arg(long = "importTrace")]
    pub import_trace: bool,
    /// Import debug mask configuration
    #[arg(long = "importDebugmask")]
    pub import_debugmask: bool,
}

pub async fn run(args: ImportArgs, profile: Option<&str>) -> Result<()> {
    let global = load_global_config()?;
    let profile = global.resolve_profile(profile)?;
    let mut session = Session::new(ApiClient::new(profile)?);

    let mut opts = ImportOptions::new(args.org, args.folder, args.connections);
    if args.import_trace {
        opts = opts.with_capability(Capability::TraceConfig);
    }
    if args.import_debugmask {
        opts = opts.with_capability(Capability::DebugMask);
    }

    importer::run(&mut session, &opts).await
}
