//! Submission coordinator
//!
//! [`MortgageEditor`] owns the creation form, the edit session and the cached
//! record list, and runs every mutation through the same pipeline:
//!
//! 1. Validate the draft (errors abort before any remote call)
//! 2. Coerce to a typed payload
//! 3. Call the remote store once
//! 4. On success, re-read the whole list; on failure, notify and keep the draft
//!
//! The list is never patched locally. State sits behind a mutex that is never
//! held across a remote call, so user events keep flowing while a request is
//! in flight.

use crate::client::RemoteCollectionClient;
use crate::error::EditorError;
use crate::event::{EditorEvent, FormTarget};
use crate::form::CreateForm;
use crate::notify::{Notification, Notifier, Operation};
use crate::session::EditSession;
use crate::state_machine::EditPhase;
use crate::view::{EditView, EditorSnapshot, FormView};
use mortgage_schema::{FieldSchema, PersistedRecord, RecordId, ValidationErrors};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct EditorState {
    records: Vec<PersistedRecord>,
    form: CreateForm,
    session: EditSession,
    refresh_issued: u64,
    refresh_applied: u64,
}

/// Coordinates drafts, validation and the remote store
pub struct MortgageEditor {
    schema: Arc<FieldSchema>,
    client: Arc<dyn RemoteCollectionClient>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<EditorState>,
}

impl std::fmt::Debug for MortgageEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MortgageEditor")
            .field("schema", &self.schema)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl MortgageEditor {
    /// Create editor with an empty list
    ///
    /// Call [`MortgageEditor::refresh`] to load the initial list.
    #[must_use]
    pub fn new(
        schema: Arc<FieldSchema>,
        client: Arc<dyn RemoteCollectionClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let form = CreateForm::new(&schema);
        Self {
            schema,
            client,
            notifier,
            state: Mutex::new(EditorState {
                records: Vec::new(),
                form,
                session: EditSession::new(),
                refresh_issued: 0,
                refresh_applied: 0,
            }),
        }
    }

    /// Field schema shared by form and table
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Copy of the current state for rendering
    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot {
        let state = self.state.lock();
        let form = FormView {
            values: state.form.values().clone(),
            errors: state.form.errors().clone(),
            submitting: state.form.is_submitting(),
        };
        let edit = match (state.session.target(), state.session.draft()) {
            (Some(target), Some(draft)) => EditView::Editing {
                target,
                values: draft.values().clone(),
                errors: draft.errors().clone(),
                saving: state.session.phase() == EditPhase::Saving,
            },
            _ => EditView::Viewing,
        };
        EditorSnapshot {
            records: state.records.clone(),
            form,
            edit,
        }
    }

    /// Records from the last applied refresh
    #[must_use]
    pub fn records(&self) -> Vec<PersistedRecord> {
        self.state.lock().records.clone()
    }

    /// Errors of the creation form
    #[must_use]
    pub fn form_errors(&self) -> ValidationErrors {
        self.state.lock().form.errors().clone()
    }

    /// Errors of the edit session, empty when viewing
    #[must_use]
    pub fn edit_errors(&self) -> ValidationErrors {
        self.state.lock().session.errors()
    }

    /// Phase of the edit session
    #[must_use]
    pub fn edit_phase(&self) -> EditPhase {
        self.state.lock().session.phase()
    }

    /// Row being edited
    #[must_use]
    pub fn editing(&self) -> Option<RecordId> {
        self.state.lock().session.target()
    }

    /// Apply one presentation layer event
    ///
    /// # Errors
    /// Whatever the handler for the event returns.
    pub async fn dispatch(&self, event: EditorEvent) -> Result<(), EditorError> {
        debug!(?event, "dispatching editor event");
        match event {
            EditorEvent::FieldChanged {
                form: FormTarget::Create,
                name,
                value,
            } => self.set_form_field(&name, value),
            EditorEvent::FieldChanged {
                form: FormTarget::Edit,
                name,
                value,
            } => self.set_edit_field(&name, value),
            EditorEvent::SubmitCreate => self.submit_create().await,
            EditorEvent::StartEdit { id } => self.start_edit(id),
            EditorEvent::SaveEdit => self.save_edit().await,
            EditorEvent::CancelEdit => {
                self.cancel_edit();
                Ok(())
            }
            EditorEvent::DeleteRecord { id } => self.delete_record(id).await,
            EditorEvent::Refresh => self.refresh().await,
        }
    }

    /// Change a creation form field
    ///
    /// # Errors
    /// `EditorError::Draft` for names outside the schema.
    pub fn set_form_field(&self, name: &str, value: impl Into<String>) -> Result<(), EditorError> {
        self.state.lock().form.set_field(&self.schema, name, value)?;
        Ok(())
    }

    /// Validate, coerce and create a record from the creation form
    ///
    /// On success the form resets and the list is re-read once. On remote
    /// failure the draft is kept and one failure notification is emitted.
    ///
    /// # Errors
    /// - `EditorError::Validation` without contacting the store
    /// - `EditorError::Draft` if a create is already in flight
    /// - `EditorError::Remote` if the store call failed
    pub async fn submit_create(&self) -> Result<(), EditorError> {
        let pending = self.state.lock().form.begin_submit(&self.schema)?;
        debug!(revision = pending.revision, "submitting new record");

        match self.client.create(&pending.record).await {
            Ok(created) => {
                info!(record = %created.id(), "record created");
                self.state.lock().form.finish_submit(pending.revision);
                self.notify_success(Operation::Create);
                self.reconcile().await;
                Ok(())
            }
            Err(source) => {
                warn!(error = %source, "create failed");
                self.state.lock().form.fail_submit();
                self.notifier.notify(Notification::failure(Operation::Create));
                Err(EditorError::remote(Operation::Create, source))
            }
        }
    }

    /// Open an edit session for a listed record
    ///
    /// Replaces any open session.
    ///
    /// # Errors
    /// `EditorError::UnknownRecord` if `id` is not in the current list.
    pub fn start_edit(&self, id: RecordId) -> Result<(), EditorError> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let record = state
            .records
            .iter()
            .find(|r| r.id() == id)
            .ok_or(EditorError::UnknownRecord(id))?;
        let ticket = state.session.start_editing(record, &self.schema);
        debug!(record = %id, %ticket, "edit session started");
        Ok(())
    }

    /// Change a field of the open edit session
    ///
    /// # Errors
    /// `EditorError::Draft` when no session is open, a save is in flight, or
    /// the name is outside the schema.
    pub fn set_edit_field(&self, name: &str, value: impl Into<String>) -> Result<(), EditorError> {
        self.state
            .lock()
            .session
            .update_draft_field(&self.schema, name, value)?;
        Ok(())
    }

    /// Validate, coerce and store the open edit session
    ///
    /// On success the session closes and the list is re-read once. On remote
    /// failure the session returns to editing with its draft intact and one
    /// failure notification is emitted.
    ///
    /// # Errors
    /// - `EditorError::Validation` without contacting the store
    /// - `EditorError::Draft` when no session is open or a save is in flight
    /// - `EditorError::Remote` if the store call failed
    pub async fn save_edit(&self) -> Result<(), EditorError> {
        let pending = self.state.lock().session.begin_save(&self.schema)?;
        debug!(record = %pending.target, ticket = %pending.ticket, "saving edit session");

        match self.client.update(pending.target, &pending.record).await {
            Ok(_) => {
                info!(record = %pending.target, "record updated");
                if !self.state.lock().session.finish_save(pending.ticket) {
                    debug!(ticket = %pending.ticket, "update completed for a replaced session");
                }
                self.notify_success(Operation::Update);
                self.reconcile().await;
                Ok(())
            }
            Err(source) => {
                warn!(record = %pending.target, error = %source, "update failed");
                if !self.state.lock().session.fail_save(pending.ticket) {
                    debug!(ticket = %pending.ticket, "update failed for a replaced session");
                }
                self.notifier.notify(Notification::failure(Operation::Update));
                Err(EditorError::remote(Operation::Update, source))
            }
        }
    }

    /// Discard the open edit session
    ///
    /// Returns the record that was being edited.
    pub fn cancel_edit(&self) -> Option<RecordId> {
        self.state.lock().session.cancel()
    }

    /// Delete a record and re-read the list
    ///
    /// # Errors
    /// `EditorError::Remote` if the store call failed; the list is unchanged.
    pub async fn delete_record(&self, id: RecordId) -> Result<(), EditorError> {
        match self.client.delete(id).await {
            Ok(()) => {
                info!(record = %id, "record deleted");
                self.notify_success(Operation::Delete);
                self.reconcile().await;
                Ok(())
            }
            Err(source) => {
                warn!(record = %id, error = %source, "delete failed");
                self.notifier.notify(Notification::failure(Operation::Delete));
                Err(EditorError::remote(Operation::Delete, source))
            }
        }
    }

    /// Replace the cached list with the store's current contents
    ///
    /// A refresh that completes after a newer one has been applied is
    /// dropped. If the row being edited is gone, its session is closed.
    ///
    /// # Errors
    /// `EditorError::Remote` if listing failed; the cached list is unchanged.
    pub async fn refresh(&self) -> Result<(), EditorError> {
        let seq = {
            let mut state = self.state.lock();
            state.refresh_issued += 1;
            state.refresh_issued
        };

        match self.client.list().await {
            Ok(records) => {
                let mut state = self.state.lock();
                if seq <= state.refresh_applied {
                    debug!(seq, applied = state.refresh_applied, "dropping stale refresh");
                    return Ok(());
                }
                debug!(seq, count = records.len(), "list refreshed");
                state.refresh_applied = seq;
                state.records = records;

                if let Some(target) = state.session.target() {
                    if !state.records.iter().any(|r| r.id() == target) {
                        debug!(record = %target, "edited record no longer listed");
                        state.session.cancel();
                    }
                }
                Ok(())
            }
            Err(source) => {
                warn!(error = %source, "refresh failed");
                self.notifier.notify(Notification::failure(Operation::Refresh));
                Err(EditorError::remote(Operation::Refresh, source))
            }
        }
    }

    fn notify_success(&self, operation: Operation) {
        if let Some(notification) = Notification::success(operation) {
            self.notifier.notify(notification);
        }
    }

    async fn reconcile(&self) {
        // refresh already notified the user on failure
        if let Err(err) = self.refresh().await {
            debug!(error = %err, "reconcile left the list unchanged");
        }
    }
}
