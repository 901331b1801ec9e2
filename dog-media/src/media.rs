use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::BinaryContent;

/// Stable identifier assigned by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaId(pub String);

impl MediaId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for MediaId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider processing status of the current binary-content submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    #[default]
    Pending,
    Ok,
    Error,
}

/// String metadata attached to a media.
///
/// Two keys are recognized by the providers: [`MediaMetadata::FILENAME`] holds
/// the original filename of uploaded content and
/// [`MediaMetadata::THUMBNAIL_URL`] holds the remote thumbnail a video
/// provider mirrors as its reference artifact. Any other key is carried as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaMetadata(BTreeMap<String, String>);

impl MediaMetadata {
    pub const FILENAME: &'static str = "filename";
    pub const THUMBNAIL_URL: &'static str = "thumbnail_url";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn filename(&self) -> Option<&str> {
        self.get(Self::FILENAME)
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.get(Self::THUMBNAIL_URL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<(String, String)> for MediaMetadata {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

/// One uploaded or remote-referenced content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: Option<MediaId>,
    pub name: String,
    pub provider_name: String,
    pub context: String,
    pub provider_reference: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub provider_status: ProviderStatus,
    pub metadata: MediaMetadata,
    pub cdn_is_flushable: bool,

    /// Payload of the current create/update submission, never persisted
    #[serde(skip)]
    pub binary_content: Option<BinaryContent>,
}

impl Media {
    pub const DEFAULT_CONTEXT: &'static str = "default";

    /// Create an empty media owned by the named provider
    pub fn new<S: Into<String>>(provider_name: S) -> Self {
        Self {
            id: None,
            name: String::new(),
            provider_name: provider_name.into(),
            context: Self::DEFAULT_CONTEXT.to_string(),
            provider_reference: None,
            content_type: None,
            size: None,
            provider_status: ProviderStatus::Pending,
            metadata: MediaMetadata::new(),
            cdn_is_flushable: false,
            binary_content: None,
        }
    }

    pub fn with_id<I: Into<MediaId>>(mut self, id: I) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_binary_content(mut self, content: BinaryContent) -> Self {
        self.set_binary_content(content);
        self
    }

    pub fn with_cdn_flushable(mut self, flushable: bool) -> Self {
        self.cdn_is_flushable = flushable;
        self
    }

    /// Submit new content; the status goes back to pending until the next transform
    pub fn set_binary_content(&mut self, content: BinaryContent) {
        self.binary_content = Some(content);
        self.provider_status = ProviderStatus::Pending;
    }

    /// Drop the transient payload once the owning record has been persisted
    pub fn clear_binary_content(&mut self) {
        self.binary_content = None;
    }

    pub fn has_binary_content(&self) -> bool {
        self.binary_content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_media_is_pending_in_default_context() {
        let media = Media::new("file");

        assert_eq!(media.provider_status, ProviderStatus::Pending);
        assert_eq!(media.context, "default");
        assert!(media.provider_reference.is_none());
        assert!(!media.cdn_is_flushable);
    }

    #[test]
    fn test_new_content_resets_status() {
        let mut media = Media::new("file");
        media.provider_status = ProviderStatus::Ok;

        media.set_binary_content(BinaryContent::raw_path("/tmp/a.png"));

        assert_eq!(media.provider_status, ProviderStatus::Pending);
        assert!(media.has_binary_content());
    }

    #[test]
    fn test_metadata_recognized_keys() {
        let mut metadata = MediaMetadata::new();
        metadata.set(MediaMetadata::FILENAME, "report.pdf");
        metadata.set(MediaMetadata::THUMBNAIL_URL, "http://x/a.jpg");
        metadata.set("author_name", "someone");

        assert_eq!(metadata.filename(), Some("report.pdf"));
        assert_eq!(metadata.thumbnail_url(), Some("http://x/a.jpg"));
        assert_eq!(metadata.len(), 3);
    }

    #[test]
    fn test_media_serializes_without_binary_content() {
        let media = Media::new("file")
            .with_id(42_u64)
            .with_name("a.png")
            .with_binary_content(BinaryContent::raw_path("/tmp/a.png"));

        let json = serde_json::to_value(&media).unwrap();

        assert_eq!(json["id"], "42");
        assert_eq!(json["provider_status"], "pending");
        assert!(json.get("binary_content").is_none());
    }
}
