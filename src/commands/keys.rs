use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::jwks;

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Generate a keypair, JWK set, and key-id property file
    Generate {
        /// Key identifier; derived from the public key when omitted
        #[arg(long)]
        kid: Option<String>,
        /// Directory to write the key files into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Append a new key to an existing JWK set
    Add {
        /// Key identifier; derived from the public key when omitted
        #[arg(long)]
        kid: Option<String>,
        /// Existing JWK set file to extend
        #[arg(long)]
        jwks: PathBuf,
        /// Directory to write the key files into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

pub fn run(cmd: KeysCommands) -> Result<()> {
    match cmd {
        KeysCommands::Generate { kid, out } => {
            let key = jwks::generate_key(kid.as_deref())?;
            jwks::write_key_files(&out, &key)?;
            println!("Generated signing key '{}' in {}", key.kid, out.display());
        }
        KeysCommands::Add { kid, jwks: set, out } => {
            let new_kid = jwks::add_key(&out, &set, kid.as_deref())?;
            println!("Added signing key '{}' to {}", new_kid, set.display());
        }
    }
    Ok(())
}
