//! Filesystem-backed blob store.
//!
//! Keys map one-to-one onto paths below a root directory:
//! `{root}/{key}`. Parent directories are created on demand and writes go
//! through a uniquely named sibling temp file that is persisted over the key.
//! A temp file that is never persisted is removed when dropped.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::store::validate_key;
use crate::{BlobError, BlobHandle, BlobResult, BlobStore};

/// Local directory store
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    #[tracing::instrument(skip(root))]
    pub async fn new(root: impl Into<PathBuf>) -> BlobResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!(path = %root.display(), "Opened filesystem blob store");
        Ok(Self { root })
    }

    /// Root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> BlobResult<PathBuf> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, key: &str) -> BlobResult<bool> {
        let path = self.path_for(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn read(&self, key: &str) -> BlobResult<Bytes> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BlobError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn create_or_open(&self, key: &str) -> BlobResult<BlobHandle> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(BlobHandle::new(key.to_string()))
    }

    #[tracing::instrument(skip(self, content), fields(key = %handle.key(), size = content.len()))]
    async fn write(&self, handle: &BlobHandle, content: Bytes) -> BlobResult<u64> {
        let path = self.path_for(handle.key())?;
        if !self.exists(handle.key()).await? {
            return Err(BlobError::not_found(handle.key()));
        }

        let parent = path.parent().unwrap_or(self.root.as_path());
        let temp = tempfile::Builder::new()
            .prefix(".blob-")
            .suffix(".part")
            .tempfile_in(parent)?;
        tokio::fs::write(temp.path(), &content).await?;
        temp.persist(&path).map_err(|e| BlobError::from(e.error))?;

        tracing::debug!(path = %path.display(), "Wrote blob");
        Ok(content.len() as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> BlobResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
