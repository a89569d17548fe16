//! Interactive agent launch.
//!
//! The agent runs with inherited stdio and no required arguments; the
//! operator types instructions referencing the prompt files directly into
//! the agent session. Launch deliberately performs no credential preflight:
//! a misconfigured server surfaces its own error once the agent calls it.

use crate::error::SetupError;
use crate::models::WorkspaceConfig;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Spawn the configured agent command in the workspace root and wait for it
/// to exit.
pub fn launch(config: &WorkspaceConfig, project_root: &Path) -> Result<ExitStatus, SetupError> {
    Command::new(&config.agent.command)
        .current_dir(project_root)
        .status()
        .map_err(|e| SetupError::AgentLaunch {
            command: config.agent.command.clone(),
            reason: if e.kind() == ErrorKind::NotFound {
                "not found on PATH".to_string()
            } else {
                e.to_string()
            },
        })
}

/// Whether `command` resolves to an executable (PATH lookup, or an existing
/// path when the command contains a separator).
pub fn command_on_path(command: &str) -> bool {
    if command.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(command).is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                let candidate = dir.join(command);
                candidate.is_file()
            })
        })
        .unwrap_or(false)
}

/// Prompt files available to reference from the agent session.
pub fn prompt_files(config: &WorkspaceConfig, project_root: &Path) -> Vec<String> {
    let dir = project_root.join(&config.prompts_dir);
    let mut files: Vec<String> = std::fs::read_dir(&dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().extension().map(|ext| ext == "md").unwrap_or(false))
                .filter_map(|e| e.file_name().into_string().ok())
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkspaceConfig;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_launch_missing_agent_fails_with_agent_launch() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = WorkspaceConfig::default();
        config.agent.command = "prospectd-no-such-agent".to_string();

        let err = launch(&config, temp_dir.path()).unwrap_err();
        match err {
            SetupError::AgentLaunch { command, reason } => {
                assert_eq!(command, "prospectd-no-such-agent");
                assert!(reason.contains("not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_is_independent_of_credential_artifacts() {
        // No .env, no client secrets, no token: launch itself must still work.
        let temp_dir = TempDir::new().unwrap();
        let mut config = WorkspaceConfig::default();
        config.agent.command = "true".to_string();

        let status = launch(&config, temp_dir.path()).unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_on_path() {
        assert!(command_on_path("sh"));
        assert!(!command_on_path("prospectd-no-such-agent"));
    }

    #[test]
    fn test_prompt_files_lists_markdown_only() {
        let temp_dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::default();
        let prompts = temp_dir.path().join(&config.prompts_dir);
        std::fs::create_dir_all(&prompts).unwrap();
        std::fs::write(prompts.join("companies.md"), "").unwrap();
        std::fs::write(prompts.join("people.md"), "").unwrap();
        std::fs::write(prompts.join("notes.txt"), "").unwrap();

        let files = prompt_files(&config, temp_dir.path());
        assert_eq!(files, vec!["companies.md", "people.md"]);
    }

    #[test]
    fn test_prompt_files_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::default();
        assert!(prompt_files(&config, temp_dir.path()).is_empty());
    }
}
