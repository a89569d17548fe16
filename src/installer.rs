//! Dependency installation for the MCP server sub-projects.
//!
//! Runs the declared package-manager command (default `uv sync`) in each
//! sub-project directory, streaming its output to the operator's terminal.
//! There is no retry policy: the first failing sub-project stops the run.

use crate::error::SetupError;
use crate::models::WorkspaceConfig;
use colored::Colorize;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Install the declared dependency set for every server sub-project.
pub fn install_all(config: &WorkspaceConfig, project_root: &Path) -> Result<(), SetupError> {
    for server in &config.servers {
        install_one(config, &server.name, &server.dir_in(project_root))?;
    }
    Ok(())
}

fn install_one(config: &WorkspaceConfig, name: &str, dir: &Path) -> Result<(), SetupError> {
    if !dir.is_dir() {
        return Err(SetupError::DependencyResolution {
            project: name.to_string(),
            reason: format!("sub-project directory {} does not exist", dir.display()),
        });
    }

    println!(
        "{}",
        format!("📦 Installing dependencies for {}...", name).cyan()
    );

    let status = Command::new(&config.installer.command)
        .args(&config.installer.args)
        .current_dir(dir)
        .status()
        .map_err(|e| SetupError::DependencyResolution {
            project: name.to_string(),
            reason: if e.kind() == ErrorKind::NotFound {
                format!(
                    "'{}' not found. Please ensure it is installed and in your PATH.",
                    config.installer.command
                )
            } else {
                e.to_string()
            },
        })?;

    if !status.success() {
        return Err(SetupError::DependencyResolution {
            project: name.to_string(),
            reason: format!(
                "'{} {}' exited with {}",
                config.installer.command,
                config.installer.args.join(" "),
                status
            ),
        });
    }

    println!("   ✓ {}", name.green());
    Ok(())
}
