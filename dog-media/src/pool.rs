use std::collections::HashMap;
use std::sync::Arc;

use crate::{Media, MediaError, MediaProvider, MediaResult, Violation};

/// Registry of providers by name, dispatching lifecycle hooks on `provider_name`.
///
/// The persistence layer calls the hooks around its own save and delete:
///
/// ```text
/// before_save   validate + transform      (before insert/update)
/// after_create  store content, renditions (after insert)
/// after_update  rewrite content           (after update)
/// after_remove  apply removal policy      (after delete)
/// ```
#[derive(Default)]
pub struct MediaPool {
    providers: HashMap<String, Arc<dyn MediaProvider>>,
}

impl MediaPool {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under its own name, replacing any previous one
    pub fn register(&mut self, provider: Arc<dyn MediaProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn MediaProvider>> {
        self.providers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Provider owning `media`
    pub fn provider_for(&self, media: &Media) -> MediaResult<&Arc<dyn MediaProvider>> {
        self.get(&media.provider_name).ok_or_else(|| {
            MediaError::precondition(format!("no provider named '{}'", media.provider_name))
        })
    }

    /// Validate submitted content, then transform when it is acceptable.
    ///
    /// Violations are returned as data and leave the media untransformed.
    pub async fn before_save(&self, media: &mut Media) -> MediaResult<Vec<Violation>> {
        let provider = self.provider_for(media)?;

        let violations = provider.validate(media).await;
        if !violations.is_empty() {
            return Ok(violations);
        }

        provider.transform(media).await?;
        Ok(Vec::new())
    }

    /// Run the create hook and drop the transient payload
    pub async fn after_create(&self, media: &mut Media) -> MediaResult<()> {
        self.provider_for(media)?.on_create(media).await?;
        media.clear_binary_content();
        Ok(())
    }

    /// Run the update hook and drop the transient payload
    pub async fn after_update(&self, media: &mut Media) -> MediaResult<()> {
        self.provider_for(media)?.on_update(media).await?;
        media.clear_binary_content();
        Ok(())
    }

    pub async fn after_remove(&self, media: &Media) -> MediaResult<()> {
        self.provider_for(media)?.on_remove(media).await
    }
}
