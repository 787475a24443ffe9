//! The ordered import pipeline.
//!
//! Entities replay against the remote API in a fixed dependency order:
//! proxies, shared flows, products, developers, apps, environment groups,
//! then for each remote environment: keystores, target servers, KVMs, debug
//! mask, trace config. Apps depend on developers; environment-scoped steps
//! depend on the remote environment list.
//!
//! The pipeline is fail-fast with no rollback. Absence of an optional
//! artifact is a silent skip; every other failure aborts the run where it
//! happened, leaving whatever was already created in place.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::client::Session;
use crate::entities::{
    apis, apps, developers, envgroups, environments, keystores, kvms, products, read_name_list,
    sharedflows, targetservers,
};
use crate::folder::{file_exists, ConfigFolder};

/// Optional pipeline steps. The unconditional core (bundles, products,
/// developers, environment groups, keystores, target servers, KVMs) always
/// runs; these toggle the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Import developer apps after developers.
    Apps,
    /// Import per-environment debug masks.
    DebugMask,
    /// Import per-environment distributed trace configuration.
    TraceConfig,
    /// Print the API-quota warning banner before starting.
    QuotaWarning,
}

/// Immutable inputs for one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub org: String,
    pub folder: PathBuf,
    /// Upper bound on in-flight upload requests within one bulk call.
    pub connections: usize,
    pub capabilities: HashSet<Capability>,
}

impl ImportOptions {
    /// Options for the canonical pipeline: apps enabled, quota warning on,
    /// debug mask and trace opt-in.
    pub fn new(org: impl Into<String>, folder: impl Into<PathBuf>, connections: usize) -> Self {
        ImportOptions {
            org: org.into(),
            folder: folder.into(),
            connections,
            capabilities: HashSet::from([Capability::Apps, Capability::QuotaWarning]),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn without_capability(mut self, capability: Capability) -> Self {
        self.capabilities.remove(&capability);
        self
    }

    fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Run the full import sequence. Returns the first error encountered.
pub async fn run(session: &mut Session, opts: &ImportOptions) -> Result<()> {
    session.set_organization(&opts.org).await?;

    if opts.has(Capability::QuotaWarning) {
        eprintln!(
            "Warning: management API calls are subject to a per-minute quota; \
             importing a large configuration can exhaust it and impact the platform."
        );
    }

    let folder = ConfigFolder::new(&opts.folder);

    println!("Importing API proxies...");
    apis::import_bundles(session, opts.connections, &folder.proxies_dir()).await?;

    println!("Importing shared flows...");
    sharedflows::import_bundles(session, opts.connections, &folder.sharedflows_dir()).await?;

    if file_exists(&folder.products_file()) {
        println!("Importing API products...");
        products::import(session, &folder.products_file()).await?;
    }

    let developers_imported = file_exists(&folder.developers_file());
    if developers_imported {
        println!("Importing developers...");
        developers::import(session, &folder.developers_file()).await?;
    }

    if opts.has(Capability::Apps) && developers_imported && file_exists(&folder.apps_file()) {
        println!("Importing developer apps...");
        apps::import(session, &folder.apps_file(), &folder.developers_file()).await?;
    }

    if file_exists(&folder.envgroups_file()) {
        println!("Importing environment group configuration...");
        envgroups::import(session, &folder.envgroups_file()).await?;
    }

    session.set_output_suppressed(true);

    // The remote list is authoritative; nothing in the folder decides which
    // environments are visited, or in what order.
    let environment_names = environments::list(session).await?;
    for environment in &environment_names {
        println!("Importing configuration for environment {environment}");
        session.set_environment(environment);

        let keystores_file = folder.keystores_file(environment);
        if file_exists(&keystores_file) {
            println!("\tImporting keystores...");
            for name in read_name_list(&keystores_file)? {
                let body = keystores::create(session, &name).await?;
                session.echo(&body);
            }
        }

        let targetservers_file = folder.targetservers_file(environment);
        if file_exists(&targetservers_file) {
            println!("\tImporting target servers...");
            targetservers::import(session, opts.connections, &targetservers_file).await?;
        }

        let kvms_file = folder.kvms_file(environment);
        if file_exists(&kvms_file) {
            println!("\tImporting KVM names...");
            for name in read_name_list(&kvms_file)? {
                // only encrypted KVMs are created
                let body = kvms::create(session, &name, true).await?;
                session.echo(&body);
            }
        }

        if opts.has(Capability::DebugMask) {
            let mask_file = folder.debugmask_file(environment);
            if file_exists(&mask_file) {
                println!("\tImporting debug mask configuration...");
                let mask = fs::read_to_string(&mask_file)
                    .with_context(|| format!("reading {}", mask_file.display()))?;
                let body = environments::set_debug_mask(session, mask).await?;
                session.echo(&body);
            }
        }

        if opts.has(Capability::TraceConfig) {
            let trace_file = folder.tracecfg_file(environment);
            if file_exists(&trace_file) {
                println!("\tImporting trace configuration...");
                let cfg = fs::read_to_string(&trace_file)
                    .with_context(|| format!("reading {}", trace_file.display()))?;
                let body = environments::import_trace_config(session, cfg).await?;
                session.echo(&body);
            }
        }
    }

    Ok(())
}
