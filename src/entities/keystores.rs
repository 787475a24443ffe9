//! Environment keystores. The artifact is a plain list of names; each name
//! becomes one create call.

use anyhow::{Context, Result};
use serde_json::json;

use crate::client::Session;

pub async fn create(session: &Session, name: &str) -> Result<String> {
    let url = session.env_url("keystores")?;
    session
        .client()
        .post_json(&url, &json!({ "name": name }))
        .await
        .with_context(|| format!("creating keystore '{name}'"))
}

pub async fn list_names(session: &Session) -> Result<Vec<String>> {
    let url = session.env_url("keystores")?;
    let body = session.client().get(&url).await.context("listing keystores")?;
    serde_json::from_str(&body).context("parsing keystore list")
}
