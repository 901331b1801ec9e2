use async_trait::async_trait;

use crate::{Media, MediaResult};

/// Generates derived artifacts (renditions) for a media.
///
/// Providers call this after the reference content is in place and do not
/// wait on its outcome: a failure is logged and the lifecycle step still
/// succeeds.
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    async fn generate(&self, media: &Media, formats: &[String]) -> MediaResult<()>;
}

/// Generator that produces nothing, for setups without renditions
#[derive(Debug, Clone, Default)]
pub struct NoopThumbnail;

#[async_trait]
impl ThumbnailGenerator for NoopThumbnail {
    async fn generate(&self, media: &Media, formats: &[String]) -> MediaResult<()> {
        tracing::debug!(media_id = ?media.id, ?formats, "Thumbnail generation skipped");
        Ok(())
    }
}
