//! Token artifact persistence.
//!
//! The artifact lives inside the spreadsheet server's sub-project directory
//! so the external server process finds it at start. Saving always replaces
//! the whole file: re-running the consent flow overwrites, never appends.

use crate::error::SetupError;
use crate::oauth::types::StoredToken;
use std::path::PathBuf;

/// File-based token storage for one server's `token.json`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored token, if present and parseable.
    pub fn load(&self) -> Option<StoredToken> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn save(&self, token: &StoredToken) -> Result<(), SetupError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SetupError::file_write(&self.path, e))?;
        }

        let data = serde_json::to_string_pretty(token).map_err(|e| SetupError::FileWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&self.path, &data).map_err(|e| SetupError::file_write(&self.path, e))?;

        // Token holds live credentials: owner-only on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| SetupError::file_write(&self.path, e))?;
        }

        Ok(())
    }

    pub fn delete(&self) -> Result<(), SetupError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| SetupError::file_write(&self.path, e))?;
        }
        Ok(())
    }
}
