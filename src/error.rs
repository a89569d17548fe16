//! Failure taxonomy for the bootstrap operations.
//!
//! Every operation is one-shot and non-retrying: an error here is terminal
//! for the current step, and the operator corrects the condition and re-runs.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// A server sub-project's declared dependencies could not be installed.
    #[error("dependency installation failed for '{project}': {reason}")]
    DependencyResolution { project: String, reason: String },

    /// A configuration artifact could not be written.
    #[error("failed to write {path}: {reason}")]
    FileWrite { path: PathBuf, reason: String },

    /// The OAuth client-secret artifact is absent. The token flow must not
    /// run before this file exists.
    #[error("OAuth client secrets not found at {path}")]
    MissingClientSecret { path: PathBuf },

    /// The operator (or the identity provider) declined the consent request.
    #[error("authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    /// The token exchange could not be completed.
    #[error("token request failed: {reason}")]
    Network { reason: String },

    /// The agent executable could not be started.
    #[error("agent command '{command}' could not be launched: {reason}")]
    AgentLaunch { command: String, reason: String },
}

impl From<reqwest::Error> for SetupError {
    fn from(err: reqwest::Error) -> Self {
        SetupError::Network {
            reason: err.to_string(),
        }
    }
}

impl SetupError {
    pub fn file_write(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        SetupError::FileWrite {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
