//! Environment key-value maps. The artifact is a plain list of names; the
//! import pipeline only ever creates encrypted maps.

use anyhow::{Context, Result};
use serde_json::json;

use crate::client::Session;

pub async fn create(session: &Session, name: &str, encrypted: bool) -> Result<String> {
    let url = session.env_url("keyvaluemaps")?;
    session
        .client()
        .post_json(&url, &json!({ "name": name, "encrypted": encrypted }))
        .await
        .with_context(|| format!("creating KVM '{name}'"))
}

pub async fn list_names(session: &Session) -> Result<Vec<String>> {
    let url = session.env_url("keyvaluemaps")?;
    let body = session.client().get(&url).await.context("listing KVMs")?;
    serde_json::from_str(&body).context("parsing KVM list")
}
