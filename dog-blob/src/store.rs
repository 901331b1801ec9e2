use async_trait::async_trait;
use bytes::Bytes;

use crate::{BlobError, BlobResult};

/// Key-addressed storage operations - must be implemented by all storage backends
///
/// Keys are `/`-separated relative paths such as `default/0001/01/ab12.png`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Check whether content is stored under `key`
    async fn exists(&self, key: &str) -> BlobResult<bool>;

    /// Read the full content stored under `key`
    ///
    /// Fails with [`BlobError::NotFound`] when the key is absent.
    async fn read(&self, key: &str) -> BlobResult<Bytes>;

    /// Open the entry under `key`, creating an empty one if it is absent
    async fn create_or_open(&self, key: &str) -> BlobResult<BlobHandle>;

    /// Replace the content behind an opened handle, returning the bytes written
    async fn write(&self, handle: &BlobHandle, content: Bytes) -> BlobResult<u64>;

    /// Remove the entry under `key`
    ///
    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> BlobResult<()>;
}

/// Handle to an opened store entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobHandle {
    key: String,
}

impl BlobHandle {
    pub(crate) fn new(key: String) -> Self {
        Self { key }
    }

    /// The key this handle was opened for
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Reject keys that are empty, absolute or escape the store root
pub fn validate_key(key: &str) -> BlobResult<()> {
    if key.is_empty() {
        return Err(BlobError::invalid("key must not be empty"));
    }
    if key.starts_with('/') || key.starts_with('\\') {
        return Err(BlobError::invalid(format!("key must be relative: {}", key)));
    }
    if key
        .split(['/', '\\'])
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(BlobError::invalid(format!("key has an invalid segment: {}", key)));
    }
    Ok(())
}
