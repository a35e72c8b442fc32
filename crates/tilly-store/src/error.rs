//! # Store Error Types
//!
//! Error types for file-backed state and the register facade.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FileError ──► StoreError::Load / StoreError::Persist (+ file path)    │
//! │                                                                         │
//! │  CoreError (tilly-core) ──► StoreError::Core                           │
//! │                                                                         │
//! │       ▼                                                                 │
//! │  Caller shows a message; in-memory state is still usable               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;
use tilly_core::{CoreError, Role, TemplateError, ValidationError};

/// Low-level cause of a failed read or write.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from tilly-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Domain rule violated (not found, validation, order lifecycle, login).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A state file exists but could not be read or parsed.
    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    /// A state file could not be written.
    ///
    /// ## When This Occurs
    /// - Data directory removed or read-only
    /// - Disk full
    ///
    /// The in-memory change that triggered the save stays applied.
    #[error("Failed to save {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    /// Operation needs a login with a higher role.
    #[error("{required} login required")]
    NotAuthorized { required: Role },

    /// Invoice template rejected by the editor.
    #[error("Invalid invoice template: {0}")]
    Template(#[from] TemplateError),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// No data directory could be determined for this platform.
    #[error("Could not determine a data directory; set TILLY_DATA_DIR")]
    NoDataDir,
}

impl StoreError {
    pub(crate) fn load(path: impl Into<PathBuf>, source: impl Into<FileError>) -> Self {
        StoreError::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn persist(path: impl Into<PathBuf>, source: impl Into<FileError>) -> Self {
        StoreError::Persist {
            path: path.into(),
            source: source.into(),
        }
    }

    /// `true` for a failed save. The in-memory state is ahead of the file.
    pub fn is_persist(&self) -> bool {
        matches!(self, StoreError::Persist { .. })
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(err.into())
    }
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_message_includes_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = StoreError::persist("/data/catalog.json", io);

        assert!(err.is_persist());
        assert_eq!(
            err.to_string(),
            "Failed to save /data/catalog.json: read-only"
        );
    }

    #[test]
    fn test_core_error_passes_through() {
        let err: StoreError = CoreError::CategoryNotFound("Drinks".to_string()).into();
        assert_eq!(err.to_string(), "Category not found: Drinks");
        assert!(!err.is_persist());
    }

    #[test]
    fn test_not_authorized_message() {
        let err = StoreError::NotAuthorized {
            required: Role::Admin,
        };
        assert_eq!(err.to_string(), "admin login required");
    }
}
