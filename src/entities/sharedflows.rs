//! Shared flow bundles.

use anyhow::Result;
use std::path::Path;

use super::bundle_api::{self, BundleKind};
use crate::client::Session;

const KIND: BundleKind = BundleKind {
    resource: "sharedflows",
    list_key: "sharedFlows",
    label: "shared flow",
};

pub async fn import_bundles(session: &Session, connections: usize, dir: &Path) -> Result<()> {
    bundle_api::import(session, &KIND, connections, dir).await
}

pub async fn export_bundles(session: &Session, connections: usize, dir: &Path) -> Result<()> {
    bundle_api::export(session, &KIND, connections, dir).await
}
