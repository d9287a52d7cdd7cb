//! Media file store
//!
//! Capability trait over the backing file store for media records, plus the
//! filesystem implementation. Handlers and services only ever see the trait,
//! so tests can substitute an in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Backing store for media files
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Probe whether a file exists in the store
    async fn exists(&self, filename: &str) -> Result<bool>;

    /// Remove a file from the store
    async fn remove(&self, filename: &str) -> Result<()>;
}

/// Filesystem-backed media store rooted at a single directory
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if it does not exist yet
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolve a stored filename under the root
    ///
    /// Filenames come from database rows; anything that could escape the
    /// root (separators, parent references) is rejected.
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename == "."
            || filename == ".."
        {
            anyhow::bail!("Invalid media filename: {:?}", filename);
        }
        Ok(self.root.join(filename))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn exists(&self, filename: &str) -> Result<bool> {
        let path = self.resolve(filename)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn remove(&self, filename: &str) -> Result<()> {
        let path = self.resolve(filename)?;
        tokio::fs::remove_file(&path).await?;
        Ok(())
    }
}
