use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use sha2::{Digest, Sha256};

use super::{MediaProvider, ProviderCore};
use crate::addressing::{derived_key, file_reference_key, REFERENCE_FORMAT};
use crate::validation::validate_file_content;
use crate::{
    BinaryContent, FileContent, Media, MediaError, MediaMetadata, MediaResult, ProviderConfig,
    ProviderStatus, RemovalPolicy, Violation,
};

/// Provider for uploaded and local files.
///
/// The raw bytes are stored verbatim at `{prefix}/{provider_reference}` where
/// the reference is a hashed name keeping the original extension.
pub struct FileProvider {
    name: String,
    core: ProviderCore,
    config: ProviderConfig,
}

impl FileProvider {
    pub fn new<S: Into<String>>(name: S, core: ProviderCore, config: ProviderConfig) -> Self {
        Self {
            name: name.into(),
            core,
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn store_content(&self, media: &Media, content: &BinaryContent) -> MediaResult<()> {
        let file = content.load().await?;
        let key = self.reference_key(media)?;
        let size = self.core.put(&key, file.bytes).await?;

        tracing::info!(key = %key, size, "Stored reference content");
        self.core.generate_thumbnails(media, &self.config.formats).await;
        Ok(())
    }
}

/// Collision-resistant storage name: hash of the name and a random nonce, plus the extension
pub(crate) fn generate_reference_name(name: &str, extension: Option<&str>) -> String {
    let nonce: u32 = rand::thread_rng().gen_range(11111..=99999);
    let digest = Sha256::digest(format!("{}{}", name, nonce).as_bytes());
    match extension {
        Some(ext) => format!("{:x}.{}", digest, ext),
        None => format!("{:x}", digest),
    }
}

#[async_trait]
impl MediaProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn formats(&self) -> &[String] {
        &self.config.formats
    }

    fn reference_key(&self, media: &Media) -> MediaResult<String> {
        file_reference_key(self.core.paths(), media)
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id))]
    async fn reference_bytes(&self, media: &Media) -> MediaResult<Bytes> {
        let key = self.reference_key(media)?;
        Ok(self.core.store().read(&key).await?)
    }

    fn public_url(&self, media: &Media, format: &str) -> MediaResult<String> {
        let key = if format == REFERENCE_FORMAT {
            self.reference_key(media)?
        } else {
            derived_key(self.core.paths(), media, format)?
        };
        Ok(self.core.cdn().resolve(&key, media.cdn_is_flushable))
    }

    fn private_url(&self, _media: &Media, _format: &str) -> MediaResult<Option<String>> {
        Ok(None)
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn transform(&self, media: &mut Media) -> MediaResult<()> {
        let loaded: Option<(BinaryContent, FileContent)> = match &media.binary_content {
            Some(content) => {
                let handle = content.resolve().await?;
                let file = handle.load().await?;
                Some((handle, file))
            }
            None => None,
        };

        let name = match &loaded {
            Some((_, file)) if !file.original_name.is_empty() => file.original_name.clone(),
            _ => media.name.clone(),
        };
        if name.is_empty() {
            return Err(MediaError::precondition("Please define a valid media name"));
        }

        let reference = match (&media.provider_reference, &loaded) {
            (Some(existing), _) => existing.clone(),
            (None, Some((_, file))) => generate_reference_name(&name, file.extension().as_deref()),
            (None, None) => {
                return Err(MediaError::precondition(
                    "no binary content to derive a provider reference from",
                ))
            }
        };

        if let Some((handle, file)) = loaded {
            if !file.original_name.is_empty() {
                media.metadata.set(MediaMetadata::FILENAME, file.original_name);
            }
            media.content_type = Some(file.mime_type);
            media.size = Some(file.size);
            media.binary_content = Some(handle);
        }
        media.name = name;
        media.provider_reference = Some(reference);
        media.provider_status = ProviderStatus::Ok;

        tracing::debug!(reference = ?media.provider_reference, "Transformed media");
        Ok(())
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn on_create(&self, media: &Media) -> MediaResult<()> {
        let Some(content) = &media.binary_content else {
            tracing::debug!("No binary content submitted, nothing to store");
            return Ok(());
        };
        self.store_content(media, content).await
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn on_update(&self, media: &Media) -> MediaResult<()> {
        let Some(content) = media.binary_content.as_ref().filter(|c| c.is_file_handle()) else {
            tracing::debug!("No file submitted with update, keeping stored content");
            return Ok(());
        };
        let content = content.resolve().await?;
        self.store_content(media, &content).await
    }

    #[tracing::instrument(skip(self, media), fields(media_id = ?media.id, provider = %self.name))]
    async fn on_remove(&self, media: &Media) -> MediaResult<()> {
        match self.config.removal_policy {
            RemovalPolicy::Retain => {
                tracing::debug!("Removal policy retains stored files");
                Ok(())
            }
            RemovalPolicy::Delete => {
                if media.provider_reference.is_none() {
                    return Ok(());
                }
                let key = self.reference_key(media)?;
                self.core.delete_keys(&[key]).await
            }
        }
    }

    async fn validate(&self, media: &Media) -> Vec<Violation> {
        validate_file_content(media.binary_content.as_ref(), &self.config).await
    }

    fn helper_properties(&self, media: &Media, _format: &str) -> MediaResult<BTreeMap<String, String>> {
        let key = self.reference_key(media)?;
        Ok(BTreeMap::from([
            ("title".to_string(), media.name.clone()),
            ("thumbnail".to_string(), key.clone()),
            ("file".to_string(), key),
        ]))
    }
}
