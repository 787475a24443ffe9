//! Signing key material for the gateway's external-authorization sidecar.
//!
//! `generate` produces three files next to each other: the RSA private key
//! (PKCS#8 PEM), the public JWK set, and a key-id property file the sidecar
//! reads at startup. `add_key` grows an existing JWK set by one fresh key,
//! replacing the private key file with the new key's.

use anyhow::{anyhow, Context, Result};
use rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding},
    traits::PublicKeyParts,
    RsaPrivateKey, RsaPublicKey,
};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::constants::{SIDECAR_JWKS_FILE, SIDECAR_KEY_FILE, SIDECAR_KID_FILE};

const KEY_BITS: usize = 2048;
const KEY_USE: &str = "sig";

pub struct GeneratedKey {
    pub kid: String,
    pub private_pem: String,
    pub jwk: Value,
}

/// Generate a fresh RSA keypair. When `kid` is omitted it is derived from
/// the SHA-256 of the public key DER.
pub fn generate_key(kid: Option<&str>) -> Result<GeneratedKey> {
    let mut rng = rand::thread_rng();
    let private =
        RsaPrivateKey::new(&mut rng, KEY_BITS).context("generating RSA private key")?;
    let public = RsaPublicKey::from(&private);

    let kid = match kid {
        Some(k) => k.to_string(),
        None => derive_kid(&public)?,
    };
    let private_pem = private
        .to_pkcs8_pem(LineEnding::LF)
        .context("encoding private key")?
        .to_string();

    Ok(GeneratedKey {
        jwk: public_jwk(&public, &kid),
        kid,
        private_pem,
    })
}

/// Write the private key, single-key JWK set, and kid property file.
pub fn write_key_files(dir: &Path, key: &GeneratedKey) -> Result<()> {
    write_file(&dir.join(SIDECAR_KEY_FILE), &key.private_pem)?;
    let set = json!({ "keys": [key.jwk] });
    write_file(&dir.join(SIDECAR_JWKS_FILE), &serde_json::to_string_pretty(&set)?)?;
    write_file(&dir.join(SIDECAR_KID_FILE), &format!("kid={}", key.kid))?;
    Ok(())
}

/// Append a fresh key to the JWK set read from `jwks_file`, writing the
/// updated set and the new private key into `dir`. Returns the new kid.
pub fn add_key(dir: &Path, jwks_file: &Path, kid: Option<&str>) -> Result<String> {
    let raw = fs::read_to_string(jwks_file)
        .with_context(|| format!("reading JWK set {}", jwks_file.display()))?;
    let mut set: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing JWK set {}", jwks_file.display()))?;
    let keys = set
        .get_mut("keys")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| anyhow!("{} has no 'keys' array", jwks_file.display()))?;

    let key = generate_key(kid)?;
    keys.push(key.jwk.clone());

    write_file(&dir.join(SIDECAR_KEY_FILE), &key.private_pem)?;
    write_file(&dir.join(SIDECAR_JWKS_FILE), &serde_json::to_string_pretty(&set)?)?;
    Ok(key.kid)
}

fn derive_kid(public: &RsaPublicKey) -> Result<String> {
    let der = public
        .to_public_key_der()
        .context("encoding public key")?;
    let digest = Sha256::digest(der.as_bytes());
    Ok(hex::encode(&digest[..8]))
}

fn public_jwk(public: &RsaPublicKey, kid: &str) -> Value {
    json!({
        "kty": "RSA",
        "use": KEY_USE,
        "kid": kid,
        "alg": "RS256",
        "n": base64::encode_config(public.n().to_bytes_be(), base64::URL_SAFE_NO_PAD),
        "e": base64::encode_config(public.e().to_bytes_be(), base64::URL_SAFE_NO_PAD),
    })
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}
