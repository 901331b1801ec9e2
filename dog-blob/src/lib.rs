//! # dog-blob: key-addressed blob storage
//!
//! `dog-blob` provides the storage primitives the DogRS media layer is built on:
//! a small [`BlobStore`] trait addressed by `/`-separated keys, plus an in-memory
//! and a local filesystem backend.
//!
//! ## Quick Start
//!
//! ```rust
//! use dog_blob::prelude::*;
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let store = MemoryBlobStore::new();
//!
//! let handle = store.create_or_open("default/0001/01/hello.txt").await?;
//! store.write(&handle, Bytes::from_static(b"Hello, world!")).await?;
//!
//! assert!(store.exists("default/0001/01/hello.txt").await?);
//! let content = store.read("default/0001/01/hello.txt").await?;
//! assert_eq!(&content[..], b"Hello, world!");
//! # Ok(())
//! # }
//! ```
//!
//! Keys are validated by every backend: they must be relative and must not
//! contain empty, `.` or `..` segments.

mod error;
mod fs;
mod memory;
pub mod store;

pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use store::{BlobHandle, BlobStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{BlobError, BlobHandle, BlobResult, BlobStore, FsBlobStore, MemoryBlobStore};
}
