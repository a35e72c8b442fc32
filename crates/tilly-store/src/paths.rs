//! # Data Directory
//!
//! Where the state files live.
//!
//! ## Resolution Order
//! 1. `TILLY_DATA_DIR` environment variable
//! 2. Platform data directory:
//!    - **macOS**: `~/Library/Application Support/com.tilly.pos/`
//!    - **Windows**: `%APPDATA%\tilly\pos\data\`
//!    - **Linux**: `~/.local/share/pos/`

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Overrides the platform data directory.
pub const DATA_DIR_ENV: &str = "TILLY_DATA_DIR";

pub const CATALOG_FILE: &str = "catalog.json";
pub const ACCOUNTS_FILE: &str = "accounts.json";
pub const CONFIG_FILE: &str = "config.json";

/// Root directory holding `catalog.json`, `accounts.json` and `config.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataDir { root: root.into() }
    }

    /// Environment override, else the platform data directory.
    pub fn resolve() -> StoreResult<Self> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                debug!(dir = %dir, "Using data directory from environment");
                return Ok(DataDir::new(dir));
            }
        }

        let dirs = ProjectDirs::from("com", "tilly", "pos").ok_or(StoreError::NoDataDir)?;
        Ok(DataDir::new(dirs.data_dir()))
    }

    /// Creates the directory if needed.
    pub fn ensure_exists(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::persist(&self.root, e))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.root.join(ACCOUNTS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_paths() {
        let dir = DataDir::new("/srv/tilly");
        assert_eq!(dir.catalog_path(), PathBuf::from("/srv/tilly/catalog.json"));
        assert_eq!(dir.accounts_path(), PathBuf::from("/srv/tilly/accounts.json"));
        assert_eq!(dir.config_path(), PathBuf::from("/srv/tilly/config.json"));
    }

    #[test]
    fn test_ensure_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::new(tmp.path().join("a").join("b"));
        dir.ensure_exists().unwrap();
        assert!(dir.root().is_dir());
    }
}
