use crate::config::{load_global_config, save_global_config, AuthConfig, ProfileConfig};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use dialoguer::Select;
use std::io::{stdin, stdout, Write};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// List configured profiles
    List,
    /// Add a new profile (interactive prompts)
    Add,
    /// Remove a profile by name
    Remove { name: String },
    /// Make a profile the default
    Default { name: String },
}

fn prompt(msg: &str) -> Result<String> {
    print!("{msg}: ");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    let val = input.trim().to_string();
    if val.is_empty() {
        Err(anyhow!("{} cannot be empty", msg))
    } else {
        Ok(val)
    }
}

pub async fn run(cmd: ConfigCommands) -> Result<()> {
    let mut global = load_global_config()?;

    match cmd {
        ConfigCommands::List => {
            if global.profiles.is_empty() {
                println!("(no profiles defined)");
            } else {
                for p in &global.profiles {
                    let marker = if global.default_profile.as_deref() == Some(p.name.as_str()) {
                        " (default)"
                    } else {
                        ""
                    };
                    println!(" - {} → {} (auth={:?}){}", p.name, p.url, p.auth, marker);
                }
            }
        }
        ConfigCommands::Add => {
            let name = prompt("Profile name")?;
            if global.profiles.iter().any(|p| p.name == name) {
                return Err(anyhow!("profile '{}' already exists", name));
            }
            let url = prompt("Management API URL")?;

            let auth_options = vec!["none", "basic", "token", "bearer"];
            let selection = Select::new()
                .with_prompt("Auth type")
                .items(&auth_options)
                .default(0)
                .interact()?;

            let auth = match auth_options[selection] {
                "none" => AuthConfig::None,
                "basic" => {
                    let user = prompt("Username")?;
                    let pw_env = prompt("Password env var")?;
                    AuthConfig::Basic {
                        username: user,
                        password_env: pw_env,
                    }
                }
                "token" => {
                    let ev = prompt("Token env var")?;
                    AuthConfig::Token { token_env: ev }
                }
                "bearer" => {
                    let ev = prompt("Bearer-token env var")?;
                    AuthConfig::Bearer { token_env: ev }
                }
                other => return Err(anyhow!("unknown auth type '{}'", other)),
            };
            if global.profiles.is_empty() {
                global.default_profile = Some(name.clone());
            }
            global.profiles.push(ProfileConfig {
                name: name.clone(),
                url,
                auth,
            });
            save_global_config(&global)?;
            println!("Added profile '{name}'");
        }
        ConfigCommands::Remove { name } => {
            let before = global.profiles.len();
            global.profiles.retain(|p| p.name != name);
            if global.profiles.len() == before {
                println!("no such profile '{name}'");
            } else {
                if global.default_profile.as_deref() == Some(name.as_str()) {
                    global.default_profile = None;
                }
                save_global_config(&global)?;
                println!("removed '{name}'");
            }
        }
        ConfigCommands::Default { name } => {
            if !global.profiles.iter().any(|p| p.name == name) {
                return Err(anyhow!("unknown profile '{}'", name));
            }
            global.default_profile = Some(name.clone());
            save_global_config(&global)?;
            println!("default profile is now '{name}'");
        }
    }

    Ok(())
}
