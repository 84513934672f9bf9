//! Inline edit session
//!
//! [`EditSession`] is the single-row edit state of the list view. At most one
//! row is edited at a time: [`EditSession::start_editing`] discards whatever
//! draft was open, so the last edit request wins and drafts are never merged.
//!
//! Each started session gets a fresh [`SessionTicket`]. Save completions carry
//! the ticket they were issued for and are ignored once the session they
//! belonged to has been replaced or cancelled.

use crate::draft::DraftBuffer;
use crate::error::DraftError;
use crate::state_machine::{validate_transition, EditPhase};
use mortgage_schema::{FieldSchema, PersistedRecord, RecordId, TypedRecord, ValidationErrors};

/// Identity of one started edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionTicket(u64);

impl std::fmt::Display for SessionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveEdit {
    target: RecordId,
    ticket: SessionTicket,
    draft: DraftBuffer,
    saving: bool,
}

/// Validated update ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    /// Record being updated
    pub target: RecordId,
    /// Session the save belongs to
    pub ticket: SessionTicket,
    /// Coerced payload
    pub record: TypedRecord,
}

/// Single-row edit state machine
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    active: Option<ActiveEdit>,
    issued: u64,
}

impl EditSession {
    /// Create session in the viewing phase
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> EditPhase {
        match &self.active {
            None => EditPhase::Viewing,
            Some(a) if a.saving => EditPhase::Saving,
            Some(_) => EditPhase::Editing,
        }
    }

    /// Record being edited
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<RecordId> {
        self.active.as_ref().map(|a| a.target)
    }

    /// Ticket of the open session
    #[inline]
    #[must_use]
    pub fn ticket(&self) -> Option<SessionTicket> {
        self.active.as_ref().map(|a| a.ticket)
    }

    /// Draft of the open session
    #[inline]
    #[must_use]
    pub fn draft(&self) -> Option<&DraftBuffer> {
        self.active.as_ref().map(|a| &a.draft)
    }

    /// Errors of the open session, empty when viewing
    #[must_use]
    pub fn errors(&self) -> ValidationErrors {
        self.draft().map(|d| d.errors().clone()).unwrap_or_default()
    }

    /// Check if `id` is the row being edited
    #[inline]
    #[must_use]
    pub fn is_editing(&self, id: RecordId) -> bool {
        self.target() == Some(id)
    }

    /// Open a draft for `record`, replacing any open session
    ///
    /// The draft starts from the record's current schema values rendered as
    /// text. Permitted from every phase.
    pub fn start_editing(&mut self, record: &PersistedRecord, schema: &FieldSchema) -> SessionTicket {
        if let Some(previous) = &self.active {
            tracing::debug!(
                previous = %previous.target,
                next = %record.id(),
                "replacing open edit session"
            );
        }

        self.issued += 1;
        let ticket = SessionTicket(self.issued);
        self.active = Some(ActiveEdit {
            target: record.id(),
            ticket,
            draft: DraftBuffer::new(record.to_raw(schema)),
            saving: false,
        });
        ticket
    }

    /// Change one field of the open draft
    ///
    /// # Errors
    /// - `DraftError::NotEditing` when viewing
    /// - `DraftError::IllegalTransition` while a save is in flight
    /// - `DraftError::UnknownField` for names outside the schema
    pub fn update_draft_field(
        &mut self,
        schema: &FieldSchema,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let phase = self.phase();
        let active = self.active.as_mut().ok_or(DraftError::NotEditing)?;
        validate_transition(phase, phase)?;
        active.draft.set_field(schema, name, value)
    }

    /// Discard the open draft
    ///
    /// Returns the record that was being edited, `None` if already viewing.
    pub fn cancel(&mut self) -> Option<RecordId> {
        let discarded = self.active.take().map(|a| a.target);
        if let Some(id) = discarded {
            tracing::debug!(record = %id, "edit session cancelled");
        }
        discarded
    }

    /// Validate the draft and mark the session as saving
    ///
    /// On validation failure the session stays in the editing phase with the
    /// errors stored on its draft.
    ///
    /// # Errors
    /// - `DraftError::NotEditing` when viewing
    /// - `DraftError::IllegalTransition` if a save is already in flight
    /// - `DraftError::Invalid` with the field errors
    pub fn begin_save(&mut self, schema: &FieldSchema) -> Result<PendingSave, DraftError> {
        let phase = self.phase();
        let active = self.active.as_mut().ok_or(DraftError::NotEditing)?;
        validate_transition(phase, EditPhase::Saving)?;

        let record = active.draft.validate(schema)?;
        active.saving = true;
        Ok(PendingSave {
            target: active.target,
            ticket: active.ticket,
            record,
        })
    }

    /// Close the session after a successful save
    ///
    /// Returns `false` without touching state if `ticket` no longer names the
    /// open session.
    pub fn finish_save(&mut self, ticket: SessionTicket) -> bool {
        if !self.is_saving(ticket) {
            return false;
        }
        self.active = None;
        true
    }

    /// Return to editing after a failed save, keeping the draft
    ///
    /// Returns `false` without touching state if `ticket` no longer names the
    /// open session.
    pub fn fail_save(&mut self, ticket: SessionTicket) -> bool {
        if !self.is_saving(ticket) {
            return false;
        }
        if let Some(active) = self.active.as_mut() {
            active.saving = false;
        }
        true
    }

    fn is_saving(&self, ticket: SessionTicket) -> bool {
        matches!(&self.active, Some(a) if a.ticket == ticket && a.saving)
    }
}
