//! # JSON File Helpers
//!
//! Scoped load/save for the three state files.
//!
//! ## Save Sequence
//! ```text
//! catalog.json.tmp ◄── BufWriter ◄── serde_json (pretty)
//!        │
//!        │ flush + sync
//!        ▼
//! rename(catalog.json.tmp → catalog.json)
//! ```
//! Handles are closed by drop on every path. A failed save removes the temp
//! file and leaves the previous `catalog.json` untouched.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FileError, StoreError, StoreResult};

/// Reads and parses a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let file = File::open(path).map_err(|e| StoreError::load(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::load(path, e))
}

/// Like [`load_json`], but a missing file is `Ok(None)`.
pub fn load_json_if_exists<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::load(path, e)),
    };
    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| StoreError::load(path, e))
}

/// Writes `value` as pretty JSON, replacing `path` only once the write succeeded.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::persist(path, e))?;
    }

    let temp = temp_path(path);
    if let Err(source) = write_file(&temp, value) {
        let _ = fs::remove_file(&temp);
        return Err(StoreError::persist(path, source));
    }

    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        StoreError::persist(path, e)
    })
}

fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), FileError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// `catalog.json` → `catalog.json.tmp`, in the same directory.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("state"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut value = BTreeMap::new();
        value.insert("Drinks".to_string(), 10.0);
        save_json(&path, &value).unwrap();

        let loaded: BTreeMap<String, f64> = load_json(&path).unwrap();
        assert_eq!(loaded, value);
        assert!(!dir.path().join("nested").join("state.json.tmp").exists());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let loaded: Option<BTreeMap<String, f64>> = load_json_if_exists(&path).unwrap();
        assert!(loaded.is_none());
        assert!(matches!(
            load_json::<BTreeMap<String, f64>>(&path),
            Err(StoreError::Load { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_json_if_exists::<BTreeMap<String, f64>>(&path).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Load {
                source: FileError::Json(_),
                ..
            }
        ));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save_json(&path, &vec![1, 2, 3]).unwrap();

        // A directory where the temp file should go makes the write fail.
        fs::create_dir(dir.path().join("state.json.tmp")).unwrap();
        let err = save_json(&path, &vec![4]).unwrap_err();

        assert!(err.is_persist());
        let kept: Vec<i32> = load_json(&path).unwrap();
        assert_eq!(kept, vec![1, 2, 3]);
    }
}
