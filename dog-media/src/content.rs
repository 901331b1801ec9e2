use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::{mime, MediaError, MediaResult};

/// Payload submitted with a create or update.
#[derive(Debug, Clone)]
pub enum BinaryContent {
    /// A path string that has not been checked yet
    RawPath(PathBuf),
    /// Bytes received from a client together with the client's filename
    Uploaded { bytes: Bytes, original_name: String },
    /// A file known to exist on the local filesystem
    LocalFile { path: PathBuf },
    /// Identifier or URL of content hosted by a remote video service
    Remote(String),
}

/// Canonical view of file content, produced by [`BinaryContent::load`]
#[derive(Debug, Clone)]
pub struct FileContent {
    pub bytes: Bytes,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileContent {
    /// Extension taken from the original filename, guessed from the MIME type otherwise
    pub fn extension(&self) -> Option<String> {
        mime::extension_of(&self.original_name)
            .or_else(|| mime::extension_for(&self.mime_type).map(str::to_string))
    }
}

impl BinaryContent {
    pub fn raw_path<P: Into<PathBuf>>(path: P) -> Self {
        Self::RawPath(path.into())
    }

    pub fn uploaded<B: Into<Bytes>, S: Into<String>>(bytes: B, original_name: S) -> Self {
        Self::Uploaded {
            bytes: bytes.into(),
            original_name: original_name.into(),
        }
    }

    pub fn local_file<P: Into<PathBuf>>(path: P) -> Self {
        Self::LocalFile { path: path.into() }
    }

    pub fn remote<S: Into<String>>(reference: S) -> Self {
        Self::Remote(reference.into())
    }

    /// True for payloads that carry file content (uploads and checked local files)
    pub fn is_file_handle(&self) -> bool {
        matches!(self, Self::Uploaded { .. } | Self::LocalFile { .. })
    }

    /// Filename the content should be known by.
    ///
    /// The client-supplied name of an upload wins; local paths use their base name.
    pub fn original_name(&self) -> Option<String> {
        match self {
            Self::Uploaded { original_name, .. } => {
                Some(original_name.clone()).filter(|n| !n.is_empty())
            }
            Self::RawPath(path) | Self::LocalFile { path } => base_name(path),
            Self::Remote(_) => None,
        }
    }

    /// Turn a raw path into a checked local file handle.
    ///
    /// Fails with a precondition error when the path is not an existing file.
    /// Other variants are returned unchanged.
    pub async fn resolve(&self) -> MediaResult<BinaryContent> {
        match self {
            Self::RawPath(path) => {
                let is_file = tokio::fs::metadata(path)
                    .await
                    .map(|meta| meta.is_file())
                    .unwrap_or(false);
                if !is_file {
                    return Err(MediaError::precondition(format!(
                        "The file does not exist: {}",
                        path.display()
                    )));
                }
                Ok(Self::LocalFile { path: path.clone() })
            }
            other => Ok(other.clone()),
        }
    }

    /// Read the content and derive its name, MIME type and size
    pub async fn load(&self) -> MediaResult<FileContent> {
        let (bytes, original_name) = match self {
            Self::Uploaded { bytes, original_name } => (bytes.clone(), original_name.clone()),
            Self::RawPath(path) | Self::LocalFile { path } => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    MediaError::precondition(format!(
                        "The file does not exist: {} ({})",
                        path.display(),
                        e
                    ))
                })?;
                (Bytes::from(bytes), base_name(path).unwrap_or_default())
            }
            Self::Remote(reference) => {
                return Err(MediaError::precondition(format!(
                    "Remote reference {} has no local content",
                    reference
                )))
            }
        };

        let name_hint = Some(original_name.as_str()).filter(|n| !n.is_empty());
        let mime_type = mime::detect(&bytes, name_hint);

        Ok(FileContent {
            size: bytes.len() as u64,
            bytes,
            original_name,
            mime_type,
        })
    }
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .filter(|n| !n.is_empty())
}
