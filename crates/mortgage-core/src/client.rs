//! Remote collection contract
//!
//! The editor never owns the records. Every mutation goes through a
//! [`RemoteCollectionClient`] and the list is re-read from it afterwards.

use async_trait::async_trait;
use mortgage_schema::{PersistedRecord, RecordId, TypedRecord};

/// CRUD access to the remote record collection
#[async_trait]
pub trait RemoteCollectionClient: Send + Sync {
    /// Fetch every record
    async fn list(&self) -> Result<Vec<PersistedRecord>, ClientError>;

    /// Create a record from a validated payload
    async fn create(&self, record: &TypedRecord) -> Result<PersistedRecord, ClientError>;

    /// Replace the fields of an existing record
    async fn update(&self, id: RecordId, record: &TypedRecord)
        -> Result<PersistedRecord, ClientError>;

    /// Remove a record
    async fn delete(&self, id: RecordId) -> Result<(), ClientError>;
}

/// Remote call failures
///
/// The editor reports all of them to the user the same way; the variants exist
/// for logging and for callers that want to branch on them.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or connectivity failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Store refused the payload
    #[error("rejected by store (status {status}): {message}")]
    Rejected {
        /// HTTP-style status code
        status: u16,
        /// Store-provided detail
        message: String,
    },

    /// Target record no longer exists
    #[error("record {0} not found")]
    NotFound(RecordId),

    /// Response could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Check if the target record is gone
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if resubmitting unchanged input could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_display() {
        let err = ClientError::NotFound(RecordId(3));
        assert_eq!(err.to_string(), "record 3 not found");

        let err = ClientError::Rejected {
            status: 422,
            message: "credit_score out of range".into(),
        };
        assert!(err.to_string().contains("422"));
    }

    #[test]
    fn client_error_classification() {
        assert!(ClientError::NotFound(RecordId(1)).is_not_found());
        assert!(!ClientError::Transport("reset".into()).is_not_found());
        assert!(ClientError::Transport("reset".into()).is_retryable());
        assert!(!ClientError::Rejected {
            status: 400,
            message: String::new()
        }
        .is_retryable());
    }
}
