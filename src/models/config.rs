//! Workspace manifest: which MCP server sub-projects exist, how their
//! credentials are supplied, and how the agent and installer are invoked.
//!
//! Persisted at `prospectd/config.toml`. Loading an absent manifest yields
//! the built-in layout (the two known servers), so every command works in a
//! freshly `init`-ed workspace without further configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default OAuth scopes requested for the spreadsheet server.
pub const SHEETS_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.readonly",
];

// =============================================================================
// Workspace Configuration
// =============================================================================

/// Prospectd workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Project name
    pub project_name: String,

    /// Directory holding the operator-authored prompt files
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// Agent configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Dependency installer configuration
    #[serde(default)]
    pub installer: InstallerConfig,

    /// MCP server sub-projects
    #[serde(default = "default_servers")]
    pub servers: Vec<ServerEntry>,
}

/// How the interactive agent is started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Executable name or path
    #[serde(default = "default_agent_command")]
    pub command: String,
}

/// How sub-project dependencies are resolved and installed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    #[serde(default = "default_installer_command")]
    pub command: String,

    #[serde(default = "default_installer_args")]
    pub args: Vec<String>,
}

/// One MCP server sub-project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Server name as registered with the agent
    pub name: String,

    /// Sub-project directory, relative to the workspace root
    pub dir: PathBuf,

    /// Entrypoint script run by the installer's runtime
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,

    /// How this server is authenticated
    #[serde(flatten)]
    pub credentials: CredentialKind,
}

/// Credential artifact consumed by a server at process start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CredentialKind {
    /// Flat key=value file holding a single opaque secret
    ApiKey {
        #[serde(default = "default_env_file")]
        env_file: String,
        key_name: String,
    },

    /// OAuth client secrets plus a generated token artifact
    Oauth {
        #[serde(default = "default_client_secrets")]
        client_secrets: String,
        #[serde(default = "default_token_file")]
        token_file: String,
        #[serde(default = "default_scopes")]
        scopes: Vec<String>,
    },
}

fn default_agent_command() -> String {
    "claude".to_string()
}

fn default_installer_command() -> String {
    "uv".to_string()
}

fn default_installer_args() -> Vec<String> {
    vec!["sync".to_string()]
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_entrypoint() -> String {
    "server.py".to_string()
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_client_secrets() -> String {
    "client_secrets.json".to_string()
}

fn default_token_file() -> String {
    "token.json".to_string()
}

fn default_scopes() -> Vec<String> {
    SHEETS_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_servers() -> Vec<ServerEntry> {
    vec![
        ServerEntry {
            name: "apollo".to_string(),
            dir: PathBuf::from("servers/apollo"),
            entrypoint: default_entrypoint(),
            credentials: CredentialKind::ApiKey {
                env_file: default_env_file(),
                key_name: "APOLLO_API_KEY".to_string(),
            },
        },
        ServerEntry {
            name: "google-sheets".to_string(),
            dir: PathBuf::from("servers/google-sheets"),
            entrypoint: default_entrypoint(),
            credentials: CredentialKind::Oauth {
                client_secrets: default_client_secrets(),
                token_file: default_token_file(),
                scopes: default_scopes(),
            },
        },
    ]
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            command: default_agent_command(),
        }
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            command: default_installer_command(),
            args: default_installer_args(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            project_name: "prospecting".to_string(),
            prompts_dir: default_prompts_dir(),
            agent: AgentConfig::default(),
            installer: InstallerConfig::default(),
            servers: default_servers(),
        }
    }
}

impl WorkspaceConfig {
    /// Load config from prospectd/config.toml
    pub fn load(project_root: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path(project_root);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: WorkspaceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to prospectd/config.toml
    pub fn save(&self, project_root: &Path) -> anyhow::Result<()> {
        let config_path = Self::path(project_root);
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join("prospectd/config.toml")
    }

    /// The first API-key authenticated server, if any
    pub fn api_key_server(&self) -> Option<&ServerEntry> {
        self.servers
            .iter()
            .find(|s| matches!(s.credentials, CredentialKind::ApiKey { .. }))
    }

    /// The first OAuth authenticated server, if any
    pub fn oauth_server(&self) -> Option<&ServerEntry> {
        self.servers
            .iter()
            .find(|s| matches!(s.credentials, CredentialKind::Oauth { .. }))
    }
}

impl ServerEntry {
    /// Sub-project directory resolved against the workspace root
    pub fn dir_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.dir)
    }
}
