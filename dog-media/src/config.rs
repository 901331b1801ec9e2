use std::str::FromStr;
use std::time::Duration;

use crate::{MediaError, MediaResult};

/// What `on_remove` does with stored artifacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Keep every stored artifact; deleting storage is left to the caller
    #[default]
    Retain,
    /// Delete the artifacts this provider addresses for the media
    Delete,
}

impl FromStr for RemovalPolicy {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retain" => Ok(RemovalPolicy::Retain),
            "delete" => Ok(RemovalPolicy::Delete),
            other => Err(MediaError::config(format!(
                "unknown removal policy '{}', expected 'retain' or 'delete'",
                other
            ))),
        }
    }
}

/// Configuration for a file provider
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Accepted filename extensions, compared case-insensitively
    pub allowed_extensions: Vec<String>,

    /// Accepted MIME types of the detected content
    pub allowed_mime_types: Vec<String>,

    /// Rendition formats requested from the thumbnail generator
    pub formats: Vec<String>,

    pub removal_policy: RemovalPolicy,
}

impl ProviderConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allowed_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    /// Load from the process environment, e.g. with prefix `MEDIA_FILE__`:
    ///
    /// ```bash
    /// export MEDIA_FILE__ALLOWED_EXTENSIONS=pdf,txt
    /// export MEDIA_FILE__ALLOWED_MIME_TYPES=application/pdf,text/plain
    /// export MEDIA_FILE__FORMATS=small,big
    /// export MEDIA_FILE__REMOVAL_POLICY=retain
    /// ```
    pub fn from_env(prefix: &str) -> MediaResult<Self> {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Load from explicit key/value pairs; keys without `prefix` are ignored
    pub fn from_vars<I>(prefix: &str, vars: I) -> MediaResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(prefix) else {
                continue;
            };
            match name {
                "ALLOWED_EXTENSIONS" => config.allowed_extensions = split_list(&value),
                "ALLOWED_MIME_TYPES" => config.allowed_mime_types = split_list(&value),
                "FORMATS" => config.formats = split_list(&value),
                "REMOVAL_POLICY" => config.removal_policy = value.parse()?,
                _ => {}
            }
        }
        Ok(config)
    }
}

/// Configuration for a remote video provider
#[derive(Debug, Clone)]
pub struct VideoConfig {
    /// Metadata endpoint; `{reference}` is replaced by the submitted video reference
    pub metadata_url_template: String,

    /// Content type recorded for transformed media
    pub content_type: String,

    pub formats: Vec<String>,

    pub removal_policy: RemovalPolicy,
}

impl VideoConfig {
    pub fn new<S: Into<String>>(metadata_url_template: S) -> Self {
        Self {
            metadata_url_template: metadata_url_template.into(),
            content_type: "video/x-flv".to_string(),
            formats: Vec::new(),
            removal_policy: RemovalPolicy::Retain,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    /// Metadata URL for one video reference
    pub fn metadata_url(&self, reference: &str) -> MediaResult<String> {
        if !self.metadata_url_template.contains("{reference}") {
            return Err(MediaError::config(format!(
                "metadata url template has no {{reference}} placeholder: {}",
                self.metadata_url_template
            )));
        }
        Ok(self.metadata_url_template.replace("{reference}", reference))
    }
}

/// HTTP client settings for remote retrieval
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Per-request timeout; none by default
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
