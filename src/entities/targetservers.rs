//! Environment target servers. Bulk import runs under the same connection
//! bound as bundle uploads.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{bulk, entity_name, read_object_array};
use crate::client::{ApiClient, Session};

pub async fn import(session: &Session, connections: usize, file: &Path) -> Result<()> {
    let items = read_object_array(file)?;
    let url = session.env_url("targetservers")?;
    let client = session.client().clone();
    let suppressed = session.output_suppressed();

    let jobs: Vec<_> = items
        .into_iter()
        .map(|item| create_one(client.clone(), url.clone(), item, suppressed))
        .collect();
    bulk::run(connections, jobs).await
}

async fn create_one(client: ApiClient, url: String, item: Value, suppressed: bool) -> Result<()> {
    let name = entity_name(&item).to_string();
    let body = client
        .post_json(&url, &item)
        .await
        .with_context(|| format!("creating target server '{name}'"))?;
    if !suppressed && !body.trim().is_empty() {
        println!("{body}");
    }
    Ok(())
}

/// Fetch every target server of the active environment into one array file.
pub async fn export(session: &Session, file: &Path) -> Result<()> {
    let base = session.env_url("targetservers")?;
    let body = session
        .client()
        .get(&base)
        .await
        .context("listing target servers")?;
    let names: Vec<String> =
        serde_json::from_str(&body).context("parsing target server list")?;
    if names.is_empty() {
        return Ok(());
    }

    let mut servers = Vec::new();
    for name in names {
        let body = session
            .client()
            .get(&format!("{base}/{name}"))
            .await
            .with_context(|| format!("fetching target server '{name}'"))?;
        let v: Value = serde_json::from_str(&body)
            .with_context(|| format!("parsing target server '{name}'"))?;
        servers.push(v);
    }

    fs::write(file, serde_json::to_string_pretty(&Value::Array(servers))?)
        .with_context(|| format!("writing {}", file.display()))?;
    Ok(())
}
