//! Integration tests for the workspace setup flow: manifest, credential
//! file, and agent wiring artifacts.

use prospectd::models::{CredentialKind, WorkspaceConfig};
use prospectd::{envfile, mcp};
use tempfile::TempDir;

fn scaffold(root: &std::path::Path) -> WorkspaceConfig {
    let config = WorkspaceConfig::default();
    for server in &config.servers {
        std::fs::create_dir_all(server.dir_in(root)).unwrap();
    }
    config.save(root).unwrap();
    config
}

#[test]
fn test_scaffold_then_reload_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let config = scaffold(temp_dir.path());

    let reloaded = WorkspaceConfig::load(temp_dir.path()).unwrap();
    assert_eq!(reloaded.project_name, config.project_name);
    assert_eq!(reloaded.servers.len(), 2);
    assert!(temp_dir.path().join("servers/apollo").is_dir());
    assert!(temp_dir.path().join("servers/google-sheets").is_dir());
}

#[test]
fn test_api_key_entry_reaches_the_consumer_location() {
    let temp_dir = TempDir::new().unwrap();
    let config = scaffold(temp_dir.path());

    let server = config.api_key_server().unwrap();
    let CredentialKind::ApiKey { env_file, key_name } = &server.credentials else {
        panic!("expected api-key credentials");
    };
    let env_path = server.dir_in(temp_dir.path()).join(env_file);

    envfile::upsert(&env_path, key_name, "sk-first").unwrap();
    envfile::upsert(&env_path, key_name, "sk-second").unwrap();

    // The gateway server reads this file at startup: the most recently
    // written value must be the one it sees, exactly once.
    let content = std::fs::read_to_string(&env_path).unwrap();
    assert_eq!(content.matches("APOLLO_API_KEY=").count(), 1);
    assert_eq!(envfile::get(&env_path, key_name).as_deref(), Some("sk-second"));
}

#[test]
fn test_agent_wiring_registers_both_servers() {
    let temp_dir = TempDir::new().unwrap();
    let config = scaffold(temp_dir.path());

    mcp::ensure_agent_mcp_json(temp_dir.path(), &config).unwrap();
    mcp::ensure_agent_settings(temp_dir.path(), &config).unwrap();

    let mcp_json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join(".mcp.json")).unwrap(),
    )
    .unwrap();
    for name in ["apollo", "google-sheets"] {
        let entry = &mcp_json["mcpServers"][name];
        assert_eq!(entry["command"].as_str(), Some("uv"));
        assert_eq!(entry["args"][0].as_str(), Some("run"));
    }

    let settings: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join(".claude/settings.local.json")).unwrap(),
    )
    .unwrap();
    let enabled = settings["enabledMcpjsonServers"].as_array().unwrap();
    assert_eq!(enabled.len(), 2);
}

#[test]
fn test_wiring_is_stable_across_reruns() {
    let temp_dir = TempDir::new().unwrap();
    let config = scaffold(temp_dir.path());

    mcp::ensure_agent_mcp_json(temp_dir.path(), &config).unwrap();
    mcp::ensure_agent_settings(temp_dir.path(), &config).unwrap();
    let first = std::fs::read_to_string(temp_dir.path().join(".claude/settings.local.json")).unwrap();

    mcp::ensure_agent_mcp_json(temp_dir.path(), &config).unwrap();
    mcp::ensure_agent_settings(temp_dir.path(), &config).unwrap();
    let second = std::fs::read_to_string(temp_dir.path().join(".claude/settings.local.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_custom_manifest_drives_wiring() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = WorkspaceConfig::default();
    config.installer.command = "poetry".to_string();
    for server in &mut config.servers {
        server.entrypoint = "main.py".to_string();
    }
    config.save(temp_dir.path()).unwrap();

    let reloaded = WorkspaceConfig::load(temp_dir.path()).unwrap();
    mcp::ensure_agent_mcp_json(temp_dir.path(), &reloaded).unwrap();

    let mcp_json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join(".mcp.json")).unwrap(),
    )
    .unwrap();
    let apollo = &mcp_json["mcpServers"]["apollo"];
    assert_eq!(apollo["command"].as_str(), Some("poetry"));
    assert_eq!(apollo["args"][3].as_str(), Some("main.py"));
}
