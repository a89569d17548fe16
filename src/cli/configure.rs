//! API-key configuration commands.
//!
//! The secret is opaque to this flow: it is written as-is and its
//! correctness is only observable when the gateway server starts.

use crate::models::{CredentialKind, WorkspaceConfig};
use crate::{envfile, Result};
use clap::Subcommand;
use colored::Colorize;
use std::env;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Store the gateway API key in the server's credential file
    SetKey {
        /// The API key value
        value: String,
    },

    /// Show the workspace configuration (secrets redacted)
    Show,
}

pub async fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::SetKey { value } => set_key(&value),
        ConfigCommands::Show => show(),
    }
}

fn set_key(value: &str) -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;

    let server = config
        .api_key_server()
        .ok_or_else(|| anyhow::anyhow!("no API-key authenticated server in the manifest"))?;
    let CredentialKind::ApiKey { env_file, key_name } = &server.credentials else {
        unreachable!("api_key_server returned a non api-key entry");
    };

    let path = server.dir_in(&project_root).join(env_file);
    envfile::upsert(&path, key_name, value)?;

    println!(
        "{}",
        format!("🔑 {} saved to {}", key_name, path.display()).green()
    );
    println!("   The {} server reads it at startup.", server.name);
    Ok(())
}

fn show() -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;

    println!("{}", format!("Workspace: {}", config.project_name).cyan().bold());
    println!("   Agent:     {}", config.agent.command);
    println!(
        "   Installer: {} {}",
        config.installer.command,
        config.installer.args.join(" ")
    );
    println!();

    for server in &config.servers {
        println!("{}", format!("Server: {}", server.name).cyan());
        println!("   Directory:  {}", server.dir.display());
        match &server.credentials {
            CredentialKind::ApiKey { env_file, key_name } => {
                let path = server.dir_in(&project_root).join(env_file);
                let display = match envfile::get(&path, key_name) {
                    Some(value) => redact(&value),
                    None => "(not set)".to_string(),
                };
                println!("   Credential: {}={}", key_name, display);
            }
            CredentialKind::Oauth {
                client_secrets,
                token_file,
                scopes,
            } => {
                let dir = server.dir_in(&project_root);
                println!(
                    "   Secrets:    {} ({})",
                    client_secrets,
                    presence(dir.join(client_secrets).exists())
                );
                println!(
                    "   Token:      {} ({})",
                    token_file,
                    presence(dir.join(token_file).exists())
                );
                println!("   Scopes:     {}", scopes.join(", "));
            }
        }
        println!();
    }
    Ok(())
}

fn presence(exists: bool) -> String {
    if exists {
        "present".to_string()
    } else {
        "missing".to_string()
    }
}

fn redact(value: &str) -> String {
    if value.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = value.chars().take(4).collect();
        format!("{}…", prefix)
    }
}
