//! Developer identities. Apps belong to developers, so these always import
//! first.

use anyhow::Result;
use std::path::Path;

use crate::client::Session;

pub async fn import(session: &Session, file: &Path) -> Result<()> {
    super::import_objects(session, "developers", "developer", file).await
}

pub async fn export(session: &Session, file: &Path) -> Result<()> {
    super::export_objects(session, "developers?expand=true", "developer", "developer", file).await
}
