/// Resolves a storage key into the URL clients fetch it from.
///
/// `flushable` marks whether cached copies of the URL may be invalidated; it is
/// passed through from the media unchanged. Flushing itself is not part of
/// this trait.
pub trait CdnResolver: Send + Sync {
    fn resolve(&self, key: &str, flushable: bool) -> String;
}

/// Serves keys from a fixed base URL, e.g. `https://cdn.example.com/uploads`
#[derive(Debug, Clone)]
pub struct ServerCdn {
    base_url: String,
}

impl ServerCdn {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl CdnResolver for ServerCdn {
    fn resolve(&self, key: &str, _flushable: bool) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }
}

/// Returns keys unchanged, for stores that are served from their own root
#[derive(Debug, Clone, Default)]
pub struct PassthroughCdn;

impl CdnResolver for PassthroughCdn {
    fn resolve(&self, key: &str, _flushable: bool) -> String {
        key.to_string()
    }
}
