//! HTTP access to the management API.
//!
//! [`ApiClient`] is a thin wrapper around `reqwest` that carries the base URL
//! and default auth headers resolved from a connection profile. [`Session`]
//! layers the active organization/environment context on top; every entity
//! call goes through a session so the org is guaranteed to have been
//! validated first.

use crate::config::{AuthConfig, ProfileConfig};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, RequestBuilder,
};
use std::env;

#[derive(Clone)]
pub struct ApiClient {
    pub base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(cfg: &ProfileConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        match &cfg.auth {
            AuthConfig::None => {}
            AuthConfig::Basic {
                username,
                password_env,
            } => {
                let pw = env::var(password_env)
                    .with_context(|| format!("reading password from ${password_env}"))?;
                let token = base64::encode_config(format!("{}:{}", username, pw), base64::STANDARD);
                let hv = HeaderValue::from_str(&format!("Basic {}", token))?;
                headers.insert(AUTHORIZATION, hv);
            }
            AuthConfig::Token { token_env } => {
                let tok = env::var(token_env)
                    .with_context(|| format!("reading token from ${token_env}"))?;
                let hv = HeaderValue::from_str(&tok)?;
                headers.insert(AUTHORIZATION, hv);
            }
            AuthConfig::Bearer { token_env } => {
                let tok = env::var(token_env)
                    .with_context(|| format!("reading token from ${token_env}"))?;
                let hv = HeaderValue::from_str(&format!("Bearer {}", tok))?;
                headers.insert(AUTHORIZATION, hv);
            }
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(ApiClient {
            base_url: cfg.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Client against a bare URL with no auth. Used by tests and local
    /// gateways.
    pub fn with_base_url(url: impl Into<String>) -> Result<Self> {
        ApiClient::new(&ProfileConfig {
            name: "anonymous".into(),
            url: url.into(),
            auth: AuthConfig::None,
        })
    }

    /// Absolute URL for a path under the `/v1` API root.
    pub fn v1(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        self.send(self.client.get(url)).await
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("management API returned {status} for {url}: {body}");
        }
        Ok(resp.bytes().await?.to_vec())
    }

    pub async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String> {
        self.send(self.client.post(url).json(body)).await
    }

    /// PUT with a raw, already-serialized JSON body.
    pub async fn put_raw(&self, url: &str, body: String) -> Result<String> {
        self.send(
            self.client
                .put(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await
    }

    /// Upload a bundle archive as a multipart form file.
    pub async fn post_bundle(&self, url: &str, file_name: &str, data: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.send(self.client.post(url).multipart(form)).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<String> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            bail!("management API returned {status}: {body}");
        }
        Ok(body)
    }
}

/// Active org/env context for a sequence of management API calls.
pub struct Session {
    client: ApiClient,
    org: Option<String>,
    env: Option<String>,
    output_suppressed: bool,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Session {
            client,
            org: None,
            env: None,
            output_suppressed: false,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Validate the organization against the API and make it the session
    /// context. Fails if the org does not exist or the caller cannot see it.
    pub async fn set_organization(&mut self, name: &str) -> Result<()> {
        let url = self.client.v1(&format!("organizations/{name}"));
        self.client
            .get(&url)
            .await
            .with_context(|| format!("resolving organization '{name}'"))?;
        self.org = Some(name.to_string());
        Ok(())
    }

    pub fn set_environment(&mut self, name: &str) {
        self.env = Some(name.to_string());
    }

    /// Suppress echoing of API response bodies; status lines still print.
    pub fn set_output_suppressed(&mut self, suppressed: bool) {
        self.output_suppressed = suppressed;
    }

    pub fn output_suppressed(&self) -> bool {
        self.output_suppressed
    }

    pub fn org(&self) -> Result<&str> {
        self.org
            .as_deref()
            .ok_or_else(|| anyhow!("no organization selected"))
    }

    pub fn env(&self) -> Result<&str> {
        self.env
            .as_deref()
            .ok_or_else(|| anyhow!("no environment selected"))
    }

    /// URL for an org-scoped resource, e.g. `apis` or `developers`.
    pub fn org_url(&self, suffix: &str) -> Result<String> {
        Ok(self
            .client
            .v1(&format!("organizations/{}/{}", self.org()?, suffix)))
    }

    /// URL for a resource scoped to the active environment.
    pub fn env_url(&self, suffix: &str) -> Result<String> {
        Ok(self.client.v1(&format!(
            "organizations/{}/environments/{}/{}",
            self.org()?,
            self.env()?,
            suffix
        )))
    }

    /// Echo a successful response body unless output is suppressed.
    pub fn echo(&self, body: &str) {
        if !self.output_suppressed && !body.trim().is_empty() {
            println!("{body}");
        }
    }
}
