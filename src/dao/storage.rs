//! Backend-neutral storage failures.

use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

type BoxedSource = Box<dyn Error + Send + Sync>;

/// Error raised by score store backends regardless of the underlying database.
///
/// Callers treat both variants alike; the split only matters for logs.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or its answer could not be read.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Description of the failed call.
        message: String,
        /// Backend-specific failure.
        #[source]
        source: BoxedSource,
    },
    /// The backend answered but refused the request.
    #[error("storage rejected request: {message}")]
    Rejected {
        /// Description of the refusal, including what the backend said.
        message: String,
        /// Backend-specific failure.
        #[source]
        source: BoxedSource,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a rejection error from a backend refusal.
    pub fn rejected(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Rejected {
            message,
            source: Box::new(source),
        }
    }
}
