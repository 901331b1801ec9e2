//! Storage key naming.
//!
//! Keys are pure functions of the injected path prefix, the media id and the
//! format name, so derived artifacts never need their location persisted:
//!
//! ```text
//! {prefix}/{provider_reference}          local reference content
//! {prefix}/thumb_{id}_{format}.jpg       derived artifacts and remote mirrors
//! ```

use crate::{Media, MediaError, MediaResult, PathGenerator};

/// Format name of the original, unmodified artifact
pub const REFERENCE_FORMAT: &str = "reference";

/// Key of a generated rendition of `media` in `format`
pub fn derived_key(paths: &dyn PathGenerator, media: &Media, format: &str) -> MediaResult<String> {
    let id = media
        .id
        .as_ref()
        .ok_or_else(|| MediaError::precondition("media has no id yet"))?;
    Ok(format!("{}/thumb_{}_{}.jpg", paths.path_for(media)?, id, format))
}

/// Key under which uploaded content is stored verbatim
pub fn file_reference_key(paths: &dyn PathGenerator, media: &Media) -> MediaResult<String> {
    let reference = media
        .provider_reference
        .as_deref()
        .ok_or_else(|| MediaError::precondition("media has no provider reference yet"))?;
    Ok(format!("{}/{}", paths.path_for(media)?, reference))
}

/// Key of the locally mirrored copy of remote reference content
pub fn mirror_reference_key(paths: &dyn PathGenerator, media: &Media) -> MediaResult<String> {
    derived_key(paths, media, REFERENCE_FORMAT)
}
