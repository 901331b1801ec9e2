//! Media providers.
//!
//! A provider owns the lifecycle of one kind of media: it turns submitted
//! content into a provider reference, stores the reference artifact, asks for
//! renditions and answers URL lookups. [`FileProvider`] handles uploaded and
//! local files, [`VideoProvider`] handles content hosted by a remote video
//! service.

mod file;
mod video;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dog_blob::BlobStore;

use crate::{
    CdnResolver, DefaultPathGenerator, Media, MediaResult, NoopThumbnail, PassthroughCdn,
    PathGenerator, ThumbnailGenerator, Violation,
};

pub use file::FileProvider;
pub use video::VideoProvider;

/// Lifecycle and addressing contract shared by every provider
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Name media refer to in `provider_name`
    fn name(&self) -> &str;

    /// Rendition formats requested on create and update
    fn formats(&self) -> &[String];

    /// Store key of the reference artifact
    fn reference_key(&self, media: &Media) -> MediaResult<String>;

    /// Bytes of the reference artifact
    async fn reference_bytes(&self, media: &Media) -> MediaResult<Bytes>;

    /// Client-facing URL of `format`, resolved through the CDN
    fn public_url(&self, media: &Media, format: &str) -> MediaResult<String>;

    /// Raw store key of `format`, or `None` when there is nothing extra to address
    fn private_url(&self, media: &Media, format: &str) -> MediaResult<Option<String>>;

    /// Derive reference, name, content type and size from the submitted content.
    ///
    /// Runs before the media is persisted. On error the media is left untouched.
    async fn transform(&self, media: &mut Media) -> MediaResult<()>;

    /// Hook run after the media was first persisted
    async fn on_create(&self, media: &Media) -> MediaResult<()>;

    /// Hook run after the media was updated
    async fn on_update(&self, media: &Media) -> MediaResult<()>;

    /// Hook run when the media is removed; what it deletes depends on the removal policy
    async fn on_remove(&self, media: &Media) -> MediaResult<()>;

    /// Check submitted content, returning every violation found
    async fn validate(&self, media: &Media) -> Vec<Violation>;

    /// Display properties for templates: `title`, `thumbnail` and `file`
    fn helper_properties(&self, media: &Media, format: &str) -> MediaResult<BTreeMap<String, String>>;
}

/// Capabilities a provider is wired to
#[derive(Clone)]
pub struct ProviderCore {
    store: Arc<dyn BlobStore>,
    paths: Arc<dyn PathGenerator>,
    cdn: Arc<dyn CdnResolver>,
    thumbnail: Arc<dyn ThumbnailGenerator>,
}

impl ProviderCore {
    /// Wire a store with the default path generator, a passthrough CDN and no renditions
    pub fn new<S: BlobStore + 'static>(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    pub fn from_arc(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            paths: Arc::new(DefaultPathGenerator::new()),
            cdn: Arc::new(PassthroughCdn),
            thumbnail: Arc::new(NoopThumbnail),
        }
    }

    pub fn with_paths<P: PathGenerator + 'static>(mut self, paths: P) -> Self {
        self.paths = Arc::new(paths);
        self
    }

    pub fn with_cdn<C: CdnResolver + 'static>(mut self, cdn: C) -> Self {
        self.cdn = Arc::new(cdn);
        self
    }

    pub fn with_thumbnail<T: ThumbnailGenerator + 'static>(mut self, thumbnail: T) -> Self {
        self.thumbnail = Arc::new(thumbnail);
        self
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    pub fn paths(&self) -> &dyn PathGenerator {
        self.paths.as_ref()
    }

    pub fn cdn(&self) -> &dyn CdnResolver {
        self.cdn.as_ref()
    }

    /// Write `content` under `key`, creating the entry when needed.
    ///
    /// An entry created by this call is removed again when the write fails.
    pub(crate) async fn put(&self, key: &str, content: Bytes) -> MediaResult<u64> {
        let existed = self.store.exists(key).await?;
        let handle = self.store.create_or_open(key).await?;

        match self.store.write(&handle, content).await {
            Ok(size) => Ok(size),
            Err(e) => {
                if !existed {
                    if let Err(cleanup) = self.store.delete(key).await {
                        tracing::warn!(key = %key, error = %cleanup, "Failed to remove partial entry");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Ask for renditions; failures are logged, not returned
    pub(crate) async fn generate_thumbnails(&self, media: &Media, formats: &[String]) {
        if let Err(e) = self.thumbnail.generate(media, formats).await {
            tracing::warn!(media_id = ?media.id, error = %e, "Thumbnail generation failed");
        }
    }

    /// Delete every key, ignoring keys that are already gone
    pub(crate) async fn delete_keys(&self, keys: &[String]) -> MediaResult<()> {
        for key in keys {
            self.store.delete(key).await?;
            tracing::debug!(key = %key, "Deleted stored artifact");
        }
        Ok(())
    }
}
