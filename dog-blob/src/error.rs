use thiserror::Error;

pub type BlobResult<T> = Result<T, BlobError>;

/// Failure of a [`BlobStore`](crate::BlobStore) operation
#[derive(Error, Debug)]
pub enum BlobError {
    /// No blob is stored under `key`
    #[error("no blob stored under key '{key}'")]
    NotFound { key: String },

    /// The key was rejected before reaching the backend
    #[error("rejected key: {message}")]
    Invalid { message: String },

    /// Error raised by a third-party backend (object storage, database, ...)
    #[error("blob backend failure: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("blob I/O failure: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Wrap an error coming from a backend implementation
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// True when the key is absent, as opposed to the store failing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
