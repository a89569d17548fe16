// Prospectd - Prospecting Agent Workspace Bootstrapper
// Wires a CLI AI agent to the Apollo and Google Sheets MCP servers

pub mod cli;
pub mod envfile;
pub mod error;
pub mod installer;
pub mod launcher;
pub mod mcp;
pub mod models;
pub mod oauth;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use error::SetupError;
pub use models::{CredentialKind, ServerEntry, WorkspaceConfig};
