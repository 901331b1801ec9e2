#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use dog_blob::{BlobHandle, BlobResult, BlobStore, MemoryBlobStore};
use dog_media::{HttpFetcher, Media, MediaError, MediaResult, ThumbnailGenerator};

pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00fake-jpeg-body";

/// Memory store that records every mutating call
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryBlobStore,
    writes: Arc<Mutex<Vec<String>>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().clone()
    }
}

#[async_trait]
impl BlobStore for RecordingStore {
    async fn exists(&self, key: &str) -> BlobResult<bool> {
        self.inner.exists(key).await
    }

    async fn read(&self, key: &str) -> BlobResult<Bytes> {
        self.inner.read(key).await
    }

    async fn create_or_open(&self, key: &str) -> BlobResult<BlobHandle> {
        self.inner.create_or_open(key).await
    }

    async fn write(&self, handle: &BlobHandle, content: Bytes) -> BlobResult<u64> {
        self.writes.lock().push(handle.key().to_string());
        self.inner.write(handle, content).await
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.deletes.lock().push(key.to_string());
        self.inner.delete(key).await
    }
}

/// Fetcher serving canned bodies by URL and counting requests
#[derive(Clone, Default)]
pub struct CountingFetcher {
    responses: Arc<Mutex<HashMap<String, Bytes>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CountingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond<U: Into<String>, B: Into<Bytes>>(self, url: U, body: B) -> Self {
        self.responses.lock().insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl HttpFetcher for CountingFetcher {
    async fn get(&self, url: &str) -> MediaResult<Bytes> {
        self.requests.lock().push(url.to_string());
        self.responses
            .lock()
            .get(url)
            .cloned()
            .ok_or_else(|| MediaError::retrieval(url, "connection refused"))
    }
}

/// Thumbnail generator that remembers what it was asked for
#[derive(Clone, Default)]
pub struct RecordingThumbnail {
    calls: Arc<Mutex<Vec<(Option<String>, Vec<String>)>>>,
}

impl RecordingThumbnail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(Option<String>, Vec<String>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ThumbnailGenerator for RecordingThumbnail {
    async fn generate(&self, media: &Media, formats: &[String]) -> MediaResult<()> {
        self.calls
            .lock()
            .push((media.id.as_ref().map(|id| id.to_string()), formats.to_vec()));
        Ok(())
    }
}

/// Memory store whose next `write` fails, as a full disk would
#[derive(Clone, Default)]
pub struct FailingWriteStore {
    pub inner: MemoryBlobStore,
    failures_left: Arc<Mutex<usize>>,
}

impl FailingWriteStore {
    pub fn failing_once() -> Self {
        let store = Self::default();
        *store.failures_left.lock() = 1;
        store
    }
}

#[async_trait]
impl BlobStore for FailingWriteStore {
    async fn exists(&self, key: &str) -> BlobResult<bool> {
        self.inner.exists(key).await
    }

    async fn read(&self, key: &str) -> BlobResult<Bytes> {
        self.inner.read(key).await
    }

    async fn create_or_open(&self, key: &str) -> BlobResult<BlobHandle> {
        self.inner.create_or_open(key).await
    }

    async fn write(&self, handle: &BlobHandle, content: Bytes) -> BlobResult<u64> {
        {
            let mut failures_left = self.failures_left.lock();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
        }
        self.inner.write(handle, content).await
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.inner.delete(key).await
    }
}
