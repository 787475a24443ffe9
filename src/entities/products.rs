//! API products.

use anyhow::Result;
use std::path::Path;

use crate::client::Session;

pub async fn import(session: &Session, file: &Path) -> Result<()> {
    super::import_objects(session, "apiproducts", "API product", file).await
}

pub async fn export(session: &Session, file: &Path) -> Result<()> {
    super::export_objects(session, "apiproducts?expand=true", "apiProduct", "API product", file)
        .await
}
