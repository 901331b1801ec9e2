//! # dog-media: media reference and storage lifecycle
//!
//! `dog-media` maps media entities to storage keys on top of [`dog_blob`]. It
//! decides where the original ("reference") content of a media lives, how
//! derived renditions are named, and what happens to stored bytes when a media
//! is created, updated or removed.
//!
//! ## Quick Start
//!
//! ```rust
//! use dog_media::prelude::*;
//! use dog_blob::MemoryBlobStore;
//!
//! # #[tokio::main]
//! # async fn main() -> MediaResult<()> {
//! let store = MemoryBlobStore::new();
//! let core = ProviderCore::new(store.clone()).with_cdn(ServerCdn::new("https://cdn.example.com"));
//! let provider = FileProvider::new(
//!     "file",
//!     core,
//!     ProviderConfig::new()
//!         .with_allowed_extensions(["txt"])
//!         .with_allowed_mime_types(["text/plain"]),
//! );
//!
//! let mut media = Media::new("file")
//!     .with_binary_content(BinaryContent::uploaded(&b"hello"[..], "hello.txt"));
//!
//! assert!(provider.validate(&media).await.is_empty());
//! provider.transform(&mut media).await?;
//!
//! // the persistence layer assigns the id, then the create hook stores the bytes
//! media.id = Some(MediaId::from(1_u64));
//! provider.on_create(&media).await?;
//!
//! assert_eq!(&provider.reference_bytes(&media).await?[..], b"hello");
//! let url = provider.public_url(&media, "reference")?;
//! assert!(url.starts_with("https://cdn.example.com/default/0001/01/"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Key scheme
//!
//! ```text
//! {prefix}/{provider_reference}       uploaded content, stored verbatim
//! {prefix}/thumb_{id}_{format}.jpg    renditions and mirrored remote references
//! ```
//!
//! `{prefix}` comes from the configured [`PathGenerator`]. Removal keeps stored
//! artifacts unless the provider is configured with [`RemovalPolicy::Delete`].

pub mod addressing;
mod cdn;
mod config;
mod content;
mod error;
mod fetch;
mod media;
pub mod mime;
mod path;
mod pool;
pub mod provider;
mod thumbnail;
mod validation;

pub use cdn::{CdnResolver, PassthroughCdn, ServerCdn};
pub use config::{FetchConfig, ProviderConfig, RemovalPolicy, VideoConfig};
pub use content::{BinaryContent, FileContent};
pub use error::{MediaError, MediaResult};
pub use fetch::{fetch_json, HttpFetcher, ReqwestFetcher};
pub use media::{Media, MediaId, MediaMetadata, ProviderStatus};
pub use path::{ContextPathGenerator, DefaultPathGenerator, PathGenerator};
pub use pool::MediaPool;
pub use provider::{FileProvider, MediaProvider, ProviderCore, VideoProvider};
pub use thumbnail::{NoopThumbnail, ThumbnailGenerator};
pub use validation::{Violation, BINARY_CONTENT_FIELD};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BinaryContent, FileProvider, Media, MediaError, MediaId, MediaPool, MediaProvider,
        MediaResult, ProviderConfig, ProviderCore, RemovalPolicy, ServerCdn, VideoConfig,
        VideoProvider, Violation,
    };
}
