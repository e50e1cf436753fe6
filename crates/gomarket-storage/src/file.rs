//! File-backed key-value store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::{debug, trace};

use crate::{KeyValueStore, StorageError};

/// Extension used for stored values.
const VALUE_EXTENSION: &str = "json";

/// Key-value store keeping one file per key inside a directory.
///
/// Keys are encoded with URL-safe base64, so any string (including the
/// `@App:name` style keys mobile storage uses) maps to a valid file name.
/// Writes land in a temporary file first and are renamed into place, so a
/// reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::io(root.display().to_string(), e))?;
        debug!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    /// Directory holding the stored values.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let name = format!("{}.{}", URL_SAFE_NO_PAD.encode(key), VALUE_EXTENSION);
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path.display().to_string(), e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{:016x}.tmp", rand::random::<u64>()));

        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(|e| StorageError::io(tmp.display().to_string(), e))?;

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::io(path.display().to_string(), e));
        }

        trace!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path.display().to_string(), e)),
        }
    }
}
