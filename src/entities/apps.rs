//! Developer apps.
//!
//! App artifacts reference their owner by `developerId`; the create endpoint
//! is scoped by developer email. The developers file that was just imported
//! supplies the id-to-email mapping, which is why the orchestrator feeds
//! both files into this call.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use super::{entity_name, read_object_array};
use crate::client::Session;

pub async fn import(session: &Session, apps_file: &Path, developers_file: &Path) -> Result<()> {
    let developers = read_object_array(developers_file)?;
    let mut emails: HashMap<String, String> = HashMap::new();
    for dev in &developers {
        if let Some(email) = dev.get("email").and_then(Value::as_str) {
            emails.insert(email.to_string(), email.to_string());
            if let Some(id) = dev.get("developerId").and_then(Value::as_str) {
                emails.insert(id.to_string(), email.to_string());
            }
        }
    }

    for mut app in read_object_array(apps_file)? {
        let name = entity_name(&app).to_string();
        let dev_ref = app
            .get("developerId")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("app '{name}' has no developerId"))?
            .to_string();
        let email = emails
            .get(&dev_ref)
            .ok_or_else(|| anyhow!("app '{name}' references unknown developer '{dev_ref}'"))?;
        let url = session.org_url(&format!("developers/{email}/apps"))?;

        // appId and developerId are assigned by the platform on create.
        if let Some(obj) = app.as_object_mut() {
            obj.remove("appId");
            obj.remove("developerId");
        }

        let body = session
            .client()
            .post_json(&url, &app)
            .await
            .with_context(|| format!("creating app '{name}' for developer '{email}'"))?;
        session.echo(&body);
    }
    Ok(())
}

/// Collect every developer's apps into one array file. Nothing is written
/// when no developer owns any app.
pub async fn export(session: &Session, file: &Path) -> Result<()> {
    let url = session.org_url("developers?expand=true")?;
    let body = session.client().get(&url).await.context("listing developers")?;
    let v: Value = serde_json::from_str(&body).context("parsing developer list")?;
    let developers = v
        .get("developer")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut apps = Vec::new();
    for dev in &developers {
        let email = match dev.get("email").and_then(Value::as_str) {
            Some(email) => email,
            None => continue,
        };
        let url = session.org_url(&format!("developers/{email}/apps?expand=true"))?;
        let body = session
            .client()
            .get(&url)
            .await
            .with_context(|| format!("listing apps for developer '{email}'"))?;
        let v: Value = serde_json::from_str(&body)
            .with_context(|| format!("parsing app list for developer '{email}'"))?;
        if let Some(list) = v.get("app").and_then(Value::as_array) {
            apps.extend(list.iter().cloned());
        }
    }

    if apps.is_empty() {
        return Ok(());
    }
    std::fs::write(file, serde_json::to_string_pretty(&Value::Array(apps))?)
        .with_context(|| format!("writing {}", file.display()))?;
    Ok(())
}
