//! Error types shared by the PostgREST storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`PostgrestDaoError`] failures.
pub type PostgrestResult<T> = Result<T, PostgrestDaoError>;

/// Failures that can occur while talking to the PostgREST endpoint.
#[derive(Debug, Error)]
pub enum PostgrestDaoError {
    /// The configured base URL cannot be used.
    #[error("invalid PostgREST base URL `{url}`: {reason}")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The API key cannot be sent as a header.
    #[error("PostgREST API key is not a valid header value")]
    InvalidApiKey {
        /// Header validation error.
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build PostgREST client")]
    ClientBuilder {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// A request to the table endpoint could not be sent.
    #[error("failed to send PostgREST request to `{table}`")]
    RequestSend {
        /// Target table.
        table: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// PostgREST answered with a non-success status.
    #[error("unexpected PostgREST response status {status} for `{table}`: {detail}")]
    RequestStatus {
        /// Target table.
        table: String,
        /// Returned status.
        status: StatusCode,
        /// Response body, as returned.
        detail: String,
    },
    /// Response payload could not be decoded into rows.
    #[error("failed to decode PostgREST response for `{table}`")]
    DecodeResponse {
        /// Target table.
        table: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

impl From<PostgrestDaoError> for StorageError {
    fn from(err: PostgrestDaoError) -> Self {
        match err {
            PostgrestDaoError::RequestStatus { .. } => StorageError::rejected(err.to_string(), err),
            _ => StorageError::unavailable(err.to_string(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_become_rejections() {
        let err = PostgrestDaoError::RequestStatus {
            table: "scores".into(),
            status: StatusCode::UNAUTHORIZED,
            detail: "{\"message\":\"Invalid API key\"}".into(),
        };
        let storage: StorageError = err.into();
        assert!(matches!(storage, StorageError::Rejected { .. }));
        assert!(storage.to_string().contains("401"));
    }
}
