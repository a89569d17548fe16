//! MCP Configuration Generator
//!
//! Generates the client-side configuration the agent needs to reach the
//! workspace's MCP servers:
//! - `.mcp.json` (project root): one stdio entry per server
//! - `.claude/settings.local.json`: enables those entries for the agent

use crate::models::{ServerEntry, WorkspaceConfig};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub command: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<HashMap<String, String>>,
}

/// MCP configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: HashMap<String, McpServerConfig>,
}

impl McpConfig {
    /// Build the MCP config for every server in the workspace manifest
    pub fn from_workspace(config: &WorkspaceConfig) -> Self {
        let mut servers = HashMap::new();
        for entry in &config.servers {
            servers.insert(entry.name.clone(), stdio_entry(config, entry));
        }
        Self {
            mcp_servers: servers,
        }
    }
}

/// A stdio launch entry for one server sub-project.
///
/// The installer's runtime launches the entrypoint inside the sub-project
/// directory, so each server resolves its own credential artifacts relative
/// to itself.
fn stdio_entry(config: &WorkspaceConfig, entry: &ServerEntry) -> McpServerConfig {
    McpServerConfig {
        command: config.installer.command.clone(),
        args: vec![
            "run".to_string(),
            "--directory".to_string(),
            entry.dir.to_string_lossy().to_string(),
            entry.entrypoint.clone(),
        ],
        env: None,
    }
}

/// Ensure the agent's `.mcp.json` registers every workspace server
///
/// Overwrites this workspace's entries unconditionally while preserving any
/// unrelated servers the operator has configured.
pub fn ensure_agent_mcp_json(project_root: &Path, config: &WorkspaceConfig) -> Result<()> {
    let mcp_json_path = project_root.join(".mcp.json");

    let mut existing: serde_json::Value = if mcp_json_path.exists() {
        let content = std::fs::read_to_string(&mcp_json_path)?;
        serde_json::from_str(&content)?
    } else {
        serde_json::json!({})
    };

    // Ensure mcpServers object exists
    if existing.get("mcpServers").is_none() {
        existing["mcpServers"] = serde_json::json!({});
    }

    for entry in &config.servers {
        existing["mcpServers"][&entry.name] =
            serde_json::to_value(stdio_entry(config, entry))?;
    }

    let content = serde_json::to_string_pretty(&existing)?;
    std::fs::write(&mcp_json_path, content)?;

    Ok(())
}

/// Ensure the agent's settings enable the workspace MCP servers
///
/// Updates `.claude/settings.local.json`, honoring a blanket
/// `enableAllProjectMcpServers` and preserving unrelated settings.
pub fn ensure_agent_settings(project_root: &Path, config: &WorkspaceConfig) -> Result<()> {
    let claude_dir = project_root.join(".claude");
    std::fs::create_dir_all(&claude_dir)?;

    let settings_path = claude_dir.join("settings.local.json");

    let mut settings: serde_json::Value = if settings_path.exists() {
        let content = std::fs::read_to_string(&settings_path)?;
        serde_json::from_str(&content)?
    } else {
        serde_json::json!({})
    };

    let all_enabled = settings
        .get("enableAllProjectMcpServers")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if all_enabled {
        return Ok(());
    }

    let names: Vec<&str> = config.servers.iter().map(|s| s.name.as_str()).collect();

    let servers = settings
        .get_mut("enabledMcpjsonServers")
        .and_then(|v| v.as_array_mut());

    if let Some(servers) = servers {
        for name in &names {
            if !servers.iter().any(|v| v.as_str() == Some(name)) {
                servers.push(serde_json::json!(name));
            }
        }
    } else {
        settings["enabledMcpjsonServers"] = serde_json::json!(names);
    }

    let content = serde_json::to_string_pretty(&settings)?;
    std::fs::write(&settings_path, content)?;

    Ok(())
}
