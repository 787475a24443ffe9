//! The export pipeline: snapshot a remote organization into the same folder
//! layout the importer reads, so export followed by import round-trips a
//! configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::client::Session;
use crate::entities::{
    apis, apps, developers, envgroups, environments, keystores, kvms, products, sharedflows,
    targetservers,
};
use crate::folder::ConfigFolder;

/// Immutable inputs for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub org: String,
    pub folder: PathBuf,
    /// Upper bound on in-flight download requests within one bulk call.
    pub connections: usize,
}

/// Snapshot the organization. Empty remote entity sets produce no file, so a
/// later import of the snapshot skips exactly the absent artifact types.
pub async fn run(session: &mut Session, opts: &ExportOptions) -> Result<()> {
    session.set_organization(&opts.org).await?;

    let folder = ConfigFolder::new(&opts.folder);
    fs::create_dir_all(folder.root())
        .with_context(|| format!("creating {}", folder.root().display()))?;

    println!("Exporting API proxies...");
    apis::export_bundles(session, opts.connections, &folder.proxies_dir()).await?;

    println!("Exporting shared flows...");
    sharedflows::export_bundles(session, opts.connections, &folder.sharedflows_dir()).await?;

    println!("Exporting API products...");
    products::export(session, &folder.products_file()).await?;

    println!("Exporting developers...");
    developers::export(session, &folder.developers_file()).await?;

    println!("Exporting developer apps...");
    apps::export(session, &folder.apps_file()).await?;

    println!("Exporting environment group configuration...");
    envgroups::export(session, &folder.envgroups_file()).await?;

    session.set_output_suppressed(true);

    let environment_names = environments::list(session).await?;
    for environment in &environment_names {
        println!("Exporting configuration for environment {environment}");
        session.set_environment(environment);

        let names = keystores::list_names(session).await?;
        if !names.is_empty() {
            println!("\tExporting keystores...");
            write_names(&folder.keystores_file(environment), &names)?;
        }

        println!("\tExporting target servers...");
        targetservers::export(session, &folder.targetservers_file(environment)).await?;

        let names = kvms::list_names(session).await?;
        if !names.is_empty() {
            println!("\tExporting KVM names...");
            write_names(&folder.kvms_file(environment), &names)?;
        }

        println!("\tExporting debug mask configuration...");
        let mask = environments::get_debug_mask(session).await?;
        if !mask.trim().is_empty() {
            fs::write(folder.debugmask_file(environment), mask)?;
        }

        println!("\tExporting trace configuration...");
        let cfg = environments::get_trace_config(session).await?;
        if !cfg.trim().is_empty() {
            fs::write(folder.tracecfg_file(environment), cfg)?;
        }
    }

    Ok(())
}

fn write_names(path: &std::path::Path, names: &[String]) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(names)?)
        .with_context(|| format!("writing {}", path.display()))
}
