use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::{MediaProvider, ProviderCore};
use crate::addressing::{derived_key, mirror_reference_key, REFERENCE_FORMAT};
use crate::fetch::fetch_json;
use crate::{
    BinaryContent, HttpFetcher, Media, MediaError, MediaResult, ProviderStatus, RemovalPolicy,
    VideoConfig, Violation,
};

/// Provider for videos hosted by a remote service.
///
/// The submitted content is the remote video reference. Its metadata comes from
/// a JSON endpoint (oEmbed style) and its reference artifact is the remote
/// thumbnail, mirrored into the store the first time it is needed.
pub struct VideoProvider {
    name: String,
    core: ProviderCore,
    fetcher: Arc<dyn HttpFetcher>,
    config: VideoConfig,
}

impl VideoProvider {
    pub fn new<S, F>(name: S, core: ProviderCore, fetcher: F, config: VideoConfig) -> Self
    where
        S: Into<String>,
        F: HttpFetcher + 'static,
    {
        Self {
            name: name.into(),
            core,
            fetcher: Arc::new(fetcher),
            config,
        }
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Fetch and decode the metadata document at `url`
    #[tracing::instrument(skip(self))]
    pub async fn fetch_metadata(
        &self,
        url: &str,
    ) -> MediaResult<serde_json::Map<String, serde_json::Value>> {
        fetch_json(self.fetcher.as_ref(), url).await
    }

    fn submitted_reference(content: &BinaryContent) -> MediaResult<String> {
        match content {
            BinaryContent::Remote(reference) if !reference.trim().is_empty() => {
                Ok(reference.trim().to_string())
            }
            BinaryContent::Remote(_) => Err(MediaError::precondition("video reference is empty")),
            _ => Err(MediaError::precondition(
                "video providers expect a remote video reference",
            )),
        }
    }

    async fn request_thumbnails(&self, media: &Media) -> MediaResult<()> {
        if !media.has_binary_content() {
            tracing::debug!("No video reference submitted, nothing to generate");
            return Ok(());
        }
        self.core.generate_thumbnails(media, &self.config.formats).await;
        Ok(())
    }
}

/// Scalar metadata values as strings; nested values are dropped
fn flatten_metadata(map: &serde_json::Map<String, serde_json::Value>) -> Vec<(String, String)> {
    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}

#[async_trait]
impl MediaProvider for VideoProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn formats(&self) -> &[String] {
        &self.config.formats
    }

    fn reference_key(&self, media: &Media) -> MediaResult<String> {
        mirror_reference_key(self.core.paths(), media)
    }

    /// Mirrored thumbnail bytes, fetched from `thumbnail_url` on first use
    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id))]
    async fn reference_bytes(&self, media: &Media) -> MediaResult<Bytes> {
        let key = self.reference_key(media)?;
        let store = self.core.store();

        if store.exists(&key).await? {
            return Ok(store.read(&key).await?);
        }

        let url = media
            .metadata
            .thumbnail_url()
            .ok_or_else(|| MediaError::precondition("media has no thumbnail_url metadata"))?;

        let bytes = self.fetcher.get(url).await?;
        if bytes.is_empty() {
            return Err(MediaError::retrieval(url, "empty response body"));
        }

        let size = self.core.put(&key, bytes.clone()).await?;
        tracing::info!(key = %key, url = %url, size, "Mirrored remote reference");
        Ok(bytes)
    }

    fn public_url(&self, media: &Media, format: &str) -> MediaResult<String> {
        let key = derived_key(self.core.paths(), media, format)?;
        Ok(self.core.cdn().resolve(&key, media.cdn_is_flushable))
    }

    fn private_url(&self, media: &Media, format: &str) -> MediaResult<Option<String>> {
        derived_key(self.core.paths(), media, format).map(Some)
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn transform(&self, media: &mut Media) -> MediaResult<()> {
        let submitted = match media.binary_content.as_ref().map(Self::submitted_reference) {
            Some(reference) => reference?,
            None => {
                if media.provider_reference.is_none() {
                    return Err(MediaError::precondition(
                        "no video reference submitted for a new media",
                    ));
                }
                if media.name.is_empty() {
                    return Err(MediaError::precondition("Please define a valid media name"));
                }
                media.provider_status = ProviderStatus::Ok;
                return Ok(());
            }
        };
        let url = self.config.metadata_url(&submitted)?;
        let document = self.fetch_metadata(&url).await?;

        let name = if media.name.is_empty() {
            document
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .to_string()
        } else {
            media.name.clone()
        };
        if name.is_empty() {
            return Err(MediaError::precondition("Please define a valid media name"));
        }

        let reference = match &media.provider_reference {
            Some(existing) => {
                if *existing != submitted {
                    tracing::warn!(
                        existing = %existing,
                        submitted = %submitted,
                        "Provider reference is immutable, keeping the existing one"
                    );
                }
                existing.clone()
            }
            None => submitted,
        };

        media.metadata.extend(flatten_metadata(&document));
        media.name = name;
        media.provider_reference = Some(reference);
        media.content_type = Some(self.config.content_type.clone());
        media.provider_status = ProviderStatus::Ok;

        tracing::debug!(reference = ?media.provider_reference, "Transformed video media");
        Ok(())
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn on_create(&self, media: &Media) -> MediaResult<()> {
        self.request_thumbnails(media).await
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn on_update(&self, media: &Media) -> MediaResult<()> {
        self.request_thumbnails(media).await
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn on_remove(&self, media: &Media) -> MediaResult<()> {
        match self.config.removal_policy {
            RemovalPolicy::Retain => {
                tracing::debug!("Removal policy retains stored thumbnails");
                Ok(())
            }
            RemovalPolicy::Delete => {
                let mut keys = Vec::with_capacity(self.config.formats.len() + 1);
                for format in &self.config.formats {
                    keys.push(derived_key(self.core.paths(), media, format)?);
                }
                keys.push(self.reference_key(media)?);
                self.core.delete_keys(&keys).await
            }
        }
    }

    async fn validate(&self, _media: &Media) -> Vec<Violation> {
        Vec::new()
    }

    fn helper_properties(&self, media: &Media, format: &str) -> MediaResult<BTreeMap<String, String>> {
        Ok(BTreeMap::from([
            ("title".to_string(), media.name.clone()),
            ("thumbnail".to_string(), self.public_url(media, REFERENCE_FORMAT)?),
            ("file".to_string(), self.public_url(media, format)?),
        ]))
    }
}
