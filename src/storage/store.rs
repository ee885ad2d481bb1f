// Content store backed by a directory of files
// Author: kelexine (https://github.com/kelexine)

use crate::error::{HeadshotError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Named byte store shared by uploads and generated results.
///
/// Names are opaque, flat identifiers. Writers never share a name, so no
/// locking is needed beyond what the backing medium gives.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read the bytes stored under `name`.
    async fn get(&self, name: &str) -> Result<Vec<u8>>;

    /// Write `bytes` under `name` and return the size actually stored.
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<u64>;
}

/// Reject anything that is not a plain file name.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(HeadshotError::Validation(format!(
            "Invalid file identifier: {:?}",
            name
        )))
    }
}

/// [`ContentStore`] over one flat directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (and create if needed) the store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!("Content store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl ContentStore for DirectoryStore {
    async fn get(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => HeadshotError::NotFound(name.to_string()),
            _ => HeadshotError::Io(e),
        })
    }

    async fn put(&self, name: &str, bytes: &[u8]) -> Result<u64> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, bytes).await?;
        let metadata = tokio::fs::metadata(&path).await?;
        Ok(metadata.len())
    }
}
