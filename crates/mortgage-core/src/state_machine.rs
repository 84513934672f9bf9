//! Edit session transitions
//!
//! Only one row may be edited at a time. Starting an edit from any phase
//! replaces the current session; a save in flight blocks draft changes and
//! a second save until it completes.

use crate::error::DraftError;
use serde::{Deserialize, Serialize};

/// Phase of the list view's edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPhase {
    /// No draft; rows show stored values
    Viewing,
    /// Draft open for one row
    Editing,
    /// Draft submitted, awaiting the store
    Saving,
}

/// Validates a phase transition
///
/// # Errors
/// `DraftError::IllegalTransition` if `to` is not reachable from `from`.
pub fn validate_transition(from: EditPhase, to: EditPhase) -> Result<(), DraftError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(DraftError::IllegalTransition { from, to })
    }
}

/// Phases reachable from `from`
#[must_use]
pub fn allowed_transitions(from: EditPhase) -> Vec<EditPhase> {
    use EditPhase::{Editing, Saving, Viewing};
    match from {
        Viewing => vec![Editing],
        Editing => vec![Editing, Saving, Viewing],
        Saving => vec![Editing, Viewing],
    }
}

fn allowed(from: EditPhase, to: EditPhase) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
