use dog_blob::BlobError;
use thiserror::Error;

/// Result type for media lifecycle operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Fatal errors that abort a lifecycle step.
///
/// Content validation problems are not errors; they are returned as
/// [`Violation`](crate::Violation) values by `validate`.
#[derive(Error, Debug)]
pub enum MediaError {
    /// A required input is missing or does not resolve (no such file, empty name, no id)
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// Remote content could not be fetched or decoded
    #[error("Retrieval failed for {url}: {message}")]
    Retrieval {
        url: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] BlobError),

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl MediaError {
    /// Create a precondition error
    pub fn precondition<S: Into<String>>(message: S) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Create a retrieval error without an underlying cause
    pub fn retrieval<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        Self::Retrieval {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a retrieval error wrapping the transport or decode failure
    pub fn retrieval_with<U, S, E>(url: U, message: S, error: E) -> Self
    where
        U: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Retrieval {
            url: url.into(),
            message: message.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the error is a missing store key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }
}
