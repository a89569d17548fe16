pub mod config;

pub use config::{AgentConfig, CredentialKind, InstallerConfig, ServerEntry, WorkspaceConfig};
