//! Per-entity-type clients for the management API.
//!
//! Each module covers one entity kind and exposes async import/export
//! functions over a [`crate::client::Session`]. File parsing stays here so
//! the orchestrators only deal with paths and ordering.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub mod apis;
pub mod apps;
pub mod developers;
pub mod envgroups;
pub mod environments;
pub mod keystores;
pub mod kvms;
pub mod products;
pub mod sharedflows;
pub mod targetservers;

mod bulk;
mod bundle_api;

/// Read an artifact that is a JSON array of entity objects.
pub(crate) fn read_object_array(path: &Path) -> Result<Vec<Value>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a JSON array of objects", path.display()))
}

/// Read an artifact that is a JSON array of plain names.
pub(crate) fn read_name_list(path: &Path) -> Result<Vec<String>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a JSON array of names", path.display()))
}

/// Best-effort display name for an entity object in error messages.
pub(crate) fn entity_name(value: &Value) -> &str {
    value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("(unnamed)")
}

/// Import a JSON array of entity objects, one create call per element, in
/// array order. The first failure aborts the rest.
pub(crate) async fn import_objects(
    session: &crate::client::Session,
    resource: &str,
    label: &str,
    file: &Path,
) -> Result<()> {
    let items = read_object_array(file)?;
    let url = session.org_url(resource)?;
    for item in items {
        let body = session
            .client()
            .post_json(&url, &item)
            .await
            .with_context(|| format!("creating {label} '{}'", entity_name(&item)))?;
        session.echo(&body);
    }
    Ok(())
}

/// Export a remote entity list to a JSON-array file. Nothing is written when
/// the remote set is empty.
pub(crate) async fn export_objects(
    session: &crate::client::Session,
    resource_query: &str,
    list_key: &str,
    label: &str,
    file: &Path,
) -> Result<()> {
    let url = session.org_url(resource_query)?;
    let body = session
        .client()
        .get(&url)
        .await
        .with_context(|| format!("listing {label} entities"))?;
    let v: Value =
        serde_json::from_str(&body).with_context(|| format!("parsing {label} list"))?;
    let items = v
        .get(list_key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if items.is_empty() {
        return Ok(());
    }
    fs::write(file, serde_json::to_string_pretty(&Value::Array(items))?)
        .with_context(|| format!("writing {}", file.display()))?;
    Ok(())
}
