//! Error types for the editor core
//!
//! Covers:
//! - Local validation failures (never reach the store)
//! - Draft and session misuse (unknown fields, no active session)
//! - Remote failures, tagged with the attempted operation

use crate::client::ClientError;
use crate::notify::Operation;
use crate::state_machine::EditPhase;
use mortgage_schema::{RecordId, ValidationErrors};

/// Main editor error type
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Input failed field validation
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Remote store call failed
    #[error("{operation} failed: {source}")]
    Remote {
        /// Attempted operation
        operation: Operation,
        /// Underlying client failure
        #[source]
        source: ClientError,
    },

    /// Draft or session misuse
    #[error(transparent)]
    Draft(DraftError),

    /// Record id is not in the current list
    #[error("record {0} is not in the current list")]
    UnknownRecord(RecordId),
}

impl EditorError {
    /// Remote failure for an operation
    #[inline]
    #[must_use]
    pub fn remote(operation: Operation, source: ClientError) -> Self {
        Self::Remote { operation, source }
    }

    /// Field errors, if this is a validation failure
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Check if the store was reached and failed
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if the user can fix this by editing input
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<DraftError> for EditorError {
    fn from(value: DraftError) -> Self {
        match value {
            DraftError::Invalid(errors) => Self::Validation(errors),
            other => Self::Draft(other),
        }
    }
}

/// Draft buffer and edit session errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// No edit session is active
    #[error("no record is being edited")]
    NotEditing,

    /// Field not declared in the schema
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Phase change not permitted
    #[error("illegal edit transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current phase
        from: EditPhase,
        /// Requested phase
        to: EditPhase,
    },

    /// Creation form already submitted and awaiting the store
    #[error("a submission is already in flight")]
    SubmitInFlight,

    /// Draft failed validation
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_draft_maps_to_validation() {
        let mut errors = ValidationErrors::new();
        errors.insert("loan_amount", "loan amount must be greater than 0.");
        let err = EditorError::from(DraftError::Invalid(errors));
        assert!(err.is_validation());
        assert!(err.validation_errors().unwrap().contains("loan_amount"));
    }

    #[test]
    fn other_draft_errors_wrap() {
        let err = EditorError::from(DraftError::NotEditing);
        assert!(matches!(err, EditorError::Draft(DraftError::NotEditing)));
        assert_eq!(err.to_string(), "no record is being edited");
    }

    #[test]
    fn remote_error_display() {
        let err = EditorError::remote(Operation::Delete, ClientError::NotFound(RecordId(9)));
        assert!(err.is_remote());
        assert_eq!(err.to_string(), "delete failed: record 9 not found");
    }
}
