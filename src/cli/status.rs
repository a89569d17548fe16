use crate::models::{CredentialKind, WorkspaceConfig};
use crate::oauth::TokenStore;
use crate::{envfile, launcher, Result};
use colored::Colorize;
use std::env;
use std::path::Path;

pub async fn run(json: bool) -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;
    let report = gather(&config, &project_root);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Status for: {}", config.project_name).cyan().bold()
    );
    println!();

    print_check("Workspace manifest", report.manifest);
    print_check(
        &format!("Agent '{}' on PATH", config.agent.command),
        report.agent_available,
    );
    println!();

    for server in &report.servers {
        println!("{}", format!("Server: {}", server.name).cyan());
        match &server.credential {
            CredentialState::ApiKey { key_name, present } => {
                print_check(&format!("{} configured", key_name), *present);
            }
            CredentialState::Oauth {
                client_secrets,
                token,
            } => {
                print_check("Client secrets", *client_secrets);
                match token {
                    TokenState::Missing => print_check("Token generated", false),
                    TokenState::Valid => print_check("Token valid", true),
                    TokenState::Expired => {
                        print_check("Token generated", true);
                        print_check("Token valid", false);
                    }
                }
            }
        }
        println!();
    }

    if !report.ready() {
        println!("{}", "💡 Run the setup steps in order:".yellow());
        println!("   prospectd install && prospectd config set-key <KEY> && prospectd auth login");
    } else {
        println!("{}", "✅ Workspace is fully configured".green().bold());
    }
    Ok(())
}

fn print_check(label: &str, ok: bool) {
    if ok {
        println!("   {} {}", "✓".green(), label);
    } else {
        println!("   {} {}", "✗".red(), label);
    }
}

#[derive(Debug, serde::Serialize)]
struct StatusReport {
    manifest: bool,
    agent_available: bool,
    servers: Vec<ServerStatus>,
}

#[derive(Debug, serde::Serialize)]
struct ServerStatus {
    name: String,
    dir_exists: bool,
    #[serde(flatten)]
    credential: CredentialState,
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "credential", rename_all = "kebab-case")]
enum CredentialState {
    ApiKey { key_name: String, present: bool },
    Oauth {
        client_secrets: bool,
        token: TokenState,
    },
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
enum TokenState {
    Missing,
    Valid,
    Expired,
}

impl StatusReport {
    fn ready(&self) -> bool {
        self.agent_available
            && self.servers.iter().all(|s| {
                s.dir_exists
                    && match &s.credential {
                        CredentialState::ApiKey { present, .. } => *present,
                        CredentialState::Oauth {
                            client_secrets,
                            token,
                        } => *client_secrets && matches!(token, TokenState::Valid),
                    }
            })
    }
}

fn gather(config: &WorkspaceConfig, project_root: &Path) -> StatusReport {
    let servers = config
        .servers
        .iter()
        .map(|server| {
            let dir = server.dir_in(project_root);
            let credential = match &server.credentials {
                CredentialKind::ApiKey { env_file, key_name } => CredentialState::ApiKey {
                    key_name: key_name.clone(),
                    present: envfile::get(&dir.join(env_file), key_name).is_some(),
                },
                CredentialKind::Oauth {
                    client_secrets,
                    token_file,
                    ..
                } => {
                    let store = TokenStore::new(dir.join(token_file));
                    let token = match store.load() {
                        None => TokenState::Missing,
                        Some(t) if t.is_valid() => TokenState::Valid,
                        Some(_) => TokenState::Expired,
                    };
                    CredentialState::Oauth {
                        client_secrets: dir.join(client_secrets).exists(),
                        token,
                    }
                }
            };
            ServerStatus {
                name: server.name.clone(),
                dir_exists: dir.is_dir(),
                credential,
            }
        })
        .collect();

    StatusReport {
        manifest: WorkspaceConfig::path(project_root).exists(),
        agent_available: launcher::command_on_path(&config.agent.command),
        servers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_gather_on_empty_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = WorkspaceConfig::default();
        config.agent.command = "prospectd-no-such-agent".to_string();

        let report = gather(&config, temp_dir.path());
        assert!(!report.manifest);
        assert!(!report.agent_available);
        assert!(!report.ready());
        assert_eq!(report.servers.len(), 2);
    }

    #[test]
    fn test_gather_sees_configured_key() {
        let temp_dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::default();
        let apollo_env = temp_dir.path().join("servers/apollo/.env");
        crate::envfile::upsert(&apollo_env, "APOLLO_API_KEY", "sk-1").unwrap();

        let report = gather(&config, temp_dir.path());
        let apollo = report
            .servers
            .iter()
            .find(|s| s.name == "apollo")
            .unwrap();
        match &apollo.credential {
            CredentialState::ApiKey { present, .. } => assert!(*present),
            _ => panic!("apollo should report an api key state"),
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        let temp_dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::default();

        let report = gather(&config, temp_dir.path());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"agent_available\""));
        assert!(json.contains("\"google-sheets\""));
    }
}
