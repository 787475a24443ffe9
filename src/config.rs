//! Connection profile management.
//!
//! A profile names a management API endpoint and the way to authenticate
//! against it. Profiles live in a single global YAML file,
//! `~/.config/apim/config.yaml`, or wherever `APIM_CONFIG_PATH` points.
//!
//! Credentials are never stored in the file itself; auth entries reference
//! environment variables that are resolved when a client is built.
//!
//! The file supports environment variable expansion on load:
//! - `${VAR}` - Simple substitution
//! - `${VAR:-default}` - Use default if VAR is unset or empty
//! - `${VAR-default}` - Use default if VAR is unset
//! - `${VAR:+alt}` - Use alt if VAR is set and non-empty
//! - `${VAR+alt}` - Use alt if VAR is set

use anyhow::{anyhow, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::constants::{APIM_CONFIG_ENV, APIM_CONFIG_FILE};

/// Top-level contents of the global configuration file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Name of the profile used when `--profile` is not given.
    #[serde(default)]
    pub default_profile: Option<String>,
    /// Known management API endpoints.
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

/// A named management API endpoint.
///
/// # Example
///
/// ```yaml
/// defaultProfile: prod
/// profiles:
///   - name: prod
///     url: https://apim.example.com
///     auth:
///       type: bearer
///       tokenEnv: APIM_TOKEN
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    /// Unique profile name.
    pub name: String,
    /// Base URL of the management API, without the `/v1` prefix.
    pub url: String,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Authentication configuration for the management API.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
#[serde(tag = "type")]
#[derive(Default)]
pub enum AuthConfig {
    /// No authentication (local gateways, test servers).
    #[default]
    None,
    /// HTTP Basic authentication.
    Basic {
        /// Username for basic auth
        username: String,
        /// Environment variable containing the password
        password_env: String,
    },
    /// Token sent verbatim in the Authorization header.
    Token {
        /// Environment variable containing the token
        token_env: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// Environment variable containing the bearer token
        token_env: String,
    },
}

impl GlobalConfig {
    /// Look up a profile by name, or fall back to the configured default.
    pub fn resolve_profile(&self, name: Option<&str>) -> anyhow::Result<&ProfileConfig> {
        let wanted = match name {
            Some(n) => n,
            None => self
                .default_profile
                .as_deref()
                .ok_or_else(|| anyhow!("no profile given and no defaultProfile configured"))?,
        };
        self.profiles
            .iter()
            .find(|p| p.name == wanted)
            .ok_or_else(|| anyhow!("unknown profile '{}'", wanted))
    }
}

fn config_path() -> PathBuf {
    env::var(APIM_CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push(APIM_CONFIG_FILE);
            p
        })
}

pub fn load_global_config() -> anyhow::Result<GlobalConfig> {
    let path = config_path();
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading profile config {}", path.display()))?;
    let cfg: GlobalConfig = serde_yaml::from_str(&expand_env_placeholders(&raw))
        .with_context(|| format!("parsing profile config {}", path.display()))?;
    Ok(cfg)
}

pub fn save_global_config(cfg: &GlobalConfig) -> anyhow::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_yaml::to_string(cfg)?;
    fs::write(&path, data)?;
    println!("Saved profiles to {}", path.display());
    Ok(())
}

pub fn expand_env_placeholders(input: &str) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?[-+])([^}]*))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let op = caps.get(2).map_or("", |m| m.as_str());
        let val = caps.get(3).map_or("", |m| m.as_str());
        let var = env::var(var_name).ok();

        match (var.as_deref(), op) {
            (Some(v), _) if op.is_empty() => v.to_string(), // ${VAR}
            (Some(v), ":-") if !v.is_empty() => v.to_string(), // ${VAR:-default}
            (None, ":-") => val.to_string(),
            (Some(v), "-") => {
                if v.is_empty() {
                    val.to_string()
                } else {
                    v.to_string()
                }
            } // ${VAR-default}
            (None, "-") => val.to_string(),
            (Some(v), ":+") if !v.is_empty() => val.to_string(), // ${VAR:+alt}
            (Some(_), "+") => val.to_string(),                   // ${VAR+alt}
            _ => "".to_string(),
        }
    })
    .to_string()
}
