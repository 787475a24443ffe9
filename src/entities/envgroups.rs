//! Environment groups.

use anyhow::Result;
use std::path::Path;

use crate::client::Session;

pub async fn import(session: &Session, file: &Path) -> Result<()> {
    super::import_objects(session, "envgroups", "environment group", file).await
}

pub async fn export(session: &Session, file: &Path) -> Result<()> {
    super::export_objects(session, "envgroups", "environmentGroups", "environment group", file)
        .await
}
