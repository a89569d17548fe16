//! OAuth commands for the spreadsheet server.

use crate::models::{CredentialKind, ServerEntry, WorkspaceConfig};
use crate::oauth::{generate_pkce, generate_state, CallbackServer, ClientSecrets, OAuthFlow, StoredToken, TokenStore};
use crate::{Result, SetupError};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Run the browser consent flow and store the token artifact
    Login {
        /// Re-run the consent flow even if a valid token exists
        #[arg(long)]
        force: bool,
    },

    /// Show token status
    Status,

    /// Delete the stored token artifact
    Logout,
}

pub async fn run(cmd: AuthCommands) -> Result<()> {
    match cmd {
        AuthCommands::Login { force } => login(force).await,
        AuthCommands::Status => status(),
        AuthCommands::Logout => logout(),
    }
}

/// The OAuth server entry plus its resolved artifact paths.
struct OAuthTarget {
    server_name: String,
    secrets_path: PathBuf,
    token_path: PathBuf,
    scopes: Vec<String>,
}

fn oauth_target(config: &WorkspaceConfig, project_root: &Path) -> Result<OAuthTarget> {
    let server: &ServerEntry = config
        .oauth_server()
        .ok_or_else(|| anyhow::anyhow!("no OAuth authenticated server in the manifest"))?;
    let CredentialKind::Oauth {
        client_secrets,
        token_file,
        scopes,
    } = &server.credentials
    else {
        unreachable!("oauth_server returned a non oauth entry");
    };

    let dir = server.dir_in(project_root);
    Ok(OAuthTarget {
        server_name: server.name.clone(),
        secrets_path: dir.join(client_secrets),
        token_path: dir.join(token_file),
        scopes: scopes.clone(),
    })
}

async fn login(force: bool) -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;
    let target = oauth_target(&config, &project_root)?;

    // The token artifact must never be generated before the client-secret
    // artifact exists
    if !target.secrets_path.exists() {
        print_client_secret_help(&target.secrets_path);
        return Err(SetupError::MissingClientSecret {
            path: target.secrets_path,
        }
        .into());
    }
    let secrets = ClientSecrets::load(&target.secrets_path)?;

    let store = TokenStore::new(target.token_path.clone());
    let flow = OAuthFlow::new(secrets.installed, target.scopes.clone());

    if let Some(existing) = store.load() {
        if existing.is_valid() && !force {
            println!(
                "{}",
                format!("✓ Token at {} is valid and ready to use", store.path().display()).green()
            );
            let rerun = Confirm::new()
                .with_prompt("Run the consent flow again anyway?")
                .default(false)
                .interact()?;
            if !rerun {
                return Ok(());
            }
        } else if !existing.is_valid() {
            if let Some(refresh_token) = existing.refresh_token.clone() {
                println!("{}", "🔄 Refreshing expired token...".cyan());
                match flow.refresh(&refresh_token).await {
                    Ok(response) => {
                        let token = StoredToken::from_response(
                            response,
                            flow.secret(),
                            flow.scopes(),
                            Some(refresh_token),
                        );
                        store.save(&token)?;
                        println!(
                            "{}",
                            format!("✅ Token refreshed and saved to {}", store.path().display())
                                .green()
                                .bold()
                        );
                        return Ok(());
                    }
                    Err(SetupError::AuthorizationDenied { reason }) => {
                        // Revoked refresh token: fall through to a full consent flow
                        println!(
                            "{}",
                            format!("⚠️  Refresh rejected ({}), starting consent flow", reason)
                                .yellow()
                        );
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    consent_flow(&flow, &store, &target.server_name).await
}

async fn consent_flow(flow: &OAuthFlow, store: &TokenStore, server_name: &str) -> Result<()> {
    let callback = CallbackServer::bind().await?;
    let redirect_uri = callback.redirect_uri();

    let pkce = generate_pkce();
    let state = generate_state();
    let auth_url = flow.authorize_url(&redirect_uri, &state, &pkce)?;

    println!("{}", "🌐 Opening browser for authorization...".cyan());
    if open::that(&auth_url).is_err() {
        println!("   Could not open a browser. Please visit:");
        println!("   {}", auth_url);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    spinner.set_message(format!("Waiting for authorization on {}...", redirect_uri));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let code = callback.wait_for_code(&state).await;
    spinner.finish_and_clear();
    let code = code?;

    println!("{}", "🔁 Exchanging authorization code for tokens...".cyan());
    let response = flow.exchange(&code, &redirect_uri, &pkce.verifier).await?;
    let token = StoredToken::from_response(response, flow.secret(), flow.scopes(), None);
    store.save(&token)?;

    println!();
    println!(
        "{}",
        format!("✅ Token saved to {}", store.path().display()).green().bold()
    );
    println!("   The {} server can now authenticate.", server_name);
    Ok(())
}

fn status() -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;
    let target = oauth_target(&config, &project_root)?;
    let store = TokenStore::new(target.token_path);

    if !target.secrets_path.exists() {
        println!(
            "{}",
            format!("✗ Client secrets missing at {}", target.secrets_path.display()).red()
        );
        println!("   Run 'prospectd auth login' for setup instructions.");
        return Ok(());
    }
    println!("{}", "✓ Client secrets present".green());

    match store.load() {
        None => {
            println!("{}", "✗ No token generated yet".yellow());
            println!("   Run 'prospectd auth login'.");
        }
        Some(token) if token.is_valid() => {
            println!("{}", "✓ Token is valid".green());
            if let Some(expiry) = token.expiry {
                println!("   Expires: {}", expiry.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        Some(token) => {
            if token.refresh_token.is_some() {
                println!("{}", "⚠ Token expired (refreshable)".yellow());
                println!("   'prospectd auth login' will refresh it.");
            } else {
                println!("{}", "✗ Token expired, no refresh token".red());
                println!("   Run 'prospectd auth login' to re-authorize.");
            }
        }
    }
    Ok(())
}

fn logout() -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;
    let target = oauth_target(&config, &project_root)?;
    let store = TokenStore::new(target.token_path);

    if store.exists() {
        store.delete()?;
        println!("{}", format!("🗑️  Removed {}", store.path().display()).green());
    } else {
        println!("{}", "No token artifact to remove".yellow());
    }
    Ok(())
}

/// The walk-through for obtaining the client-secret artifact from the
/// provider console.
fn print_client_secret_help(path: &Path) {
    println!("{}", format!("Error: {} not found!", path.display()).red());
    println!();
    println!("Please follow these steps:");
    println!("1. Go to https://console.cloud.google.com/");
    println!("2. Create a new project or select an existing one");
    println!("3. Enable the following APIs:");
    println!("   - Google Sheets API");
    println!("   - Google Drive API");
    println!("4. Go to 'Credentials' -> 'Create Credentials' -> 'OAuth 2.0 Client ID'");
    println!("5. Choose 'Desktop app' as the application type");
    println!("6. Download the credentials JSON file");
    println!("7. Save it as {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_oauth_target_resolves_artifact_paths() {
        let temp_dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::default();

        let target = oauth_target(&config, temp_dir.path()).unwrap();
        assert_eq!(target.server_name, "google-sheets");
        assert!(target
            .secrets_path
            .ends_with("servers/google-sheets/client_secrets.json"));
        assert!(target.token_path.ends_with("servers/google-sheets/token.json"));
        assert_eq!(target.scopes.len(), 2);
    }

    #[test]
    fn test_oauth_target_requires_an_oauth_server() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = WorkspaceConfig::default();
        config.servers.retain(|s| s.name == "apollo");

        assert!(oauth_target(&config, temp_dir.path()).is_err());
    }
}
