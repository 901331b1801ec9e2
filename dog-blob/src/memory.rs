use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::store::validate_key;
use crate::{BlobError, BlobHandle, BlobResult, BlobStore};

/// In-memory store for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    /// Content indexed by key
    entries: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Sorted snapshot of the stored keys
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, key: &str) -> BlobResult<bool> {
        validate_key(key)?;
        Ok(self.entries.read().contains_key(key))
    }

    async fn read(&self, key: &str) -> BlobResult<Bytes> {
        validate_key(key)?;
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::not_found(key))
    }

    async fn create_or_open(&self, key: &str) -> BlobResult<BlobHandle> {
        validate_key(key)?;
        self.entries
            .write()
            .entry(key.to_string())
            .or_insert_with(Bytes::new);
        Ok(BlobHandle::new(key.to_string()))
    }

    async fn write(&self, handle: &BlobHandle, content: Bytes) -> BlobResult<u64> {
        let size = content.len() as u64;
        let mut entries = self.entries.write();
        match entries.get_mut(handle.key()) {
            Some(slot) => {
                *slot = content;
                Ok(size)
            }
            // The entry was deleted after the handle was opened
            None => Err(BlobError::not_found(handle.key())),
        }
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        validate_key(key)?;
        self.entries.write().remove(key);
        Ok(())
    }
}
