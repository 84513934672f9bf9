//! Presentation layer events

use mortgage_schema::RecordId;
use serde::{Deserialize, Serialize};

/// Which draft a field change targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormTarget {
    /// The creation form
    Create,
    /// The open edit session
    Edit,
}

/// User action forwarded by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// Field input changed
    FieldChanged {
        /// Draft being changed
        form: FormTarget,
        /// Field name
        name: String,
        /// New raw value
        value: String,
    },
    /// Submit the creation form
    SubmitCreate,
    /// Open an edit session for a row
    StartEdit {
        /// Row to edit
        id: RecordId,
    },
    /// Save the edit session
    SaveEdit,
    /// Discard the edit session
    CancelEdit,
    /// Delete a row
    DeleteRecord {
        /// Row to delete
        id: RecordId,
    },
    /// Re-read the list
    Refresh,
}

impl EditorEvent {
    /// Creation form field change
    #[must_use]
    pub fn field_changed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldChanged {
            form: FormTarget::Create,
            name: name.into(),
            value: value.into(),
        }
    }

    /// Edit session field change
    #[must_use]
    pub fn field_changed_in_edit(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldChanged {
            form: FormTarget::Edit,
            name: name.into(),
            value: value.into(),
        }
    }
}
