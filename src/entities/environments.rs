//! Environment listing and per-environment debug/trace settings.
//!
//! The remote list is the authoritative environment set for both pipelines;
//! local folder contents never decide which environments are visited.

use anyhow::{Context, Result};
use crate::client::Session;

/// List the organization's environments, in the order the API returns them.
pub async fn list(session: &Session) -> Result<Vec<String>> {
    let url = session.org_url("environments")?;
    let body = session.client().get(&url).await.context("listing environments")?;
    let envs: Vec<String> =
        serde_json::from_str(&body).context("parsing environment list")?;
    Ok(envs)
}

/// Replace the active environment's debug mask with an already-serialized
/// JSON document.
pub async fn set_debug_mask(session: &Session, mask: String) -> Result<String> {
    let url = session.env_url("debugmask")?;
    session
        .client()
        .put_raw(&url, mask)
        .await
        .context("updating debug mask")
}

/// Replace the active environment's distributed trace configuration.
pub async fn import_trace_config(session: &Session, cfg: String) -> Result<String> {
    let url = session.env_url("traceConfig")?;
    session
        .client()
        .put_raw(&url, cfg)
        .await
        .context("updating trace configuration")
}

pub async fn get_debug_mask(session: &Session) -> Result<String> {
    let url = session.env_url("debugmask")?;
    session.client().get(&url).await.context("fetching debug mask")
}

pub async fn get_trace_config(session: &Session) -> Result<String> {
    let url = session.env_url("traceConfig")?;
    session
        .client()
        .get(&url)
        .await
        .context("fetching trace configuration")
}
