//! Shared implementation for the two bundle-based entity kinds, API proxies
//! and shared flows. They differ only in resource path, list key, and label.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::bulk;
use crate::bundle::{self, Bundle};
use crate::client::{ApiClient, Session};

pub(crate) struct BundleKind {
    pub resource: &'static str,
    pub list_key: &'static str,
    pub label: &'static str,
}

/// Upload every bundle found in `dir`, at most `connections` at a time.
/// The folder itself must exist; bundle-based imports are unconditional.
pub(crate) async fn import(
    session: &Session,
    kind: &BundleKind,
    connections: usize,
    dir: &Path,
) -> Result<()> {
    let bundles = bundle::discover_bundles(dir)?;
    let base = session.org_url(kind.resource)?;
    let client = session.client().clone();
    let suppressed = session.output_suppressed();

    let jobs: Vec<_> = bundles
        .into_iter()
        .map(|b| upload(client.clone(), base.clone(), kind.label, b, suppressed))
        .collect();
    bulk::run(connections, jobs).await
}

async fn upload(
    client: ApiClient,
    base: String,
    label: &'static str,
    bundle: Bundle,
    suppressed: bool,
) -> Result<()> {
    let data = bundle.read_archive()?;
    let url = format!("{base}?action=import&name={}", bundle.name);
    let body = client
        .post_bundle(&url, &format!("{}.zip", bundle.name), data)
        .await
        .with_context(|| format!("importing {label} '{}'", bundle.name))?;
    if !suppressed && !body.trim().is_empty() {
        println!("{body}");
    }
    Ok(())
}

/// Download the latest revision bundle of every entity into `dir`.
/// Nothing is written when the remote list is empty.
pub(crate) async fn export(
    session: &Session,
    kind: &BundleKind,
    connections: usize,
    dir: &Path,
) -> Result<()> {
    let base = session.org_url(kind.resource)?;
    let body = session.client().get(&base).await?;
    let names = parse_names(&body, kind)?;
    if names.is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let client = session.client().clone();
    let jobs: Vec<_> = names
        .into_iter()
        .map(|name| download(client.clone(), base.clone(), kind.label, name, dir.to_path_buf()))
        .collect();
    bulk::run(connections, jobs).await
}

fn parse_names(body: &str, kind: &BundleKind) -> Result<Vec<String>> {
    let v: Value =
        serde_json::from_str(body).with_context(|| format!("parsing {} list", kind.label))?;
    let items = match v.get(kind.list_key).and_then(Value::as_array) {
        Some(items) => items,
        None => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .filter_map(|i| i.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

async fn download(
    client: ApiClient,
    base: String,
    label: &'static str,
    name: String,
    dir: PathBuf,
) -> Result<()> {
    let detail = client
        .get(&format!("{base}/{name}"))
        .await
        .with_context(|| format!("fetching {label} '{name}'"))?;
    let v: Value = serde_json::from_str(&detail)?;
    let revision = v
        .get("revision")
        .and_then(Value::as_array)
        .and_then(|revs| revs.last())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{label} '{name}' has no revisions"))?;
    let data = client
        .get_bytes(&format!("{base}/{name}/revisions/{revision}?format=bundle"))
        .await
        .with_context(|| format!("downloading {label} bundle '{name}'"))?;
    fs::write(dir.join(format!("{name}.zip")), data)
        .with_context(|| format!("writing {label} bundle '{name}'"))?;
    Ok(())
}
