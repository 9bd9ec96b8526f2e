//! Upload collaborator: turns submitted files into stored references.
//!
//! The binder treats any upload error as fatal to the whole submission and
//! surfaces the collaborator's message to the caller; nothing is retried.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{FormError, Result};

/// A file received with a submission, already sitting in a temporary
/// location on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Field name the file was submitted under.
    pub field: String,
    /// Client-side file name.
    pub name: String,
    /// Temporary location of the received bytes.
    pub path: PathBuf,
}

impl UploadedFile {
    pub fn new(field: impl Into<String>, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            field: field.into(),
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Moves an uploaded file into permanent storage and returns the
/// reference value to persist in its place.
pub trait UploadHandler {
    fn handle_upload(&mut self, file: &UploadedFile) -> Result<Value>;
}

/// Stores uploads under a root directory as `{uuid}-{name}` and returns
/// the stored path as the reference value.
pub struct DirectoryUploadStore {
    root: PathBuf,
}

impl DirectoryUploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl UploadHandler for DirectoryUploadStore {
    fn handle_upload(&mut self, file: &UploadedFile) -> Result<Value> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FormError::Io)?;
        }
        let stored = self
            .root
            .join(format!("{}-{}", Uuid::new_v4(), file.name));
        fs::copy(&file.path, &stored)
            .map_err(|e| FormError::Upload(format!("{}: {}", file.name, e)))?;
        Ok(Value::String(stored.to_string_lossy().into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_the_file_and_returns_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming.txt");
        fs::write(&incoming, "payload").unwrap();

        let mut store = DirectoryUploadStore::new(dir.path().join("uploads"));
        let file = UploadedFile::new("attachment", "incoming.txt", &incoming);
        let reference = store.handle_upload(&file).unwrap();

        let stored_path = PathBuf::from(reference.as_str().unwrap());
        assert!(stored_path.exists());
        assert_eq!(fs::read_to_string(&stored_path).unwrap(), "payload");
        assert!(stored_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("-incoming.txt"));
    }

    #[test]
    fn missing_source_file_is_an_upload_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryUploadStore::new(dir.path().join("uploads"));
        let file = UploadedFile::new("attachment", "ghost.txt", dir.path().join("ghost.txt"));
        let err = store.handle_upload(&file).unwrap_err();
        assert!(matches!(err, FormError::Upload(message) if message.contains("ghost.txt")));
    }
}
