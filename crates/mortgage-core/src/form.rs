//! Creation form
//!
//! Holds the draft for a new record. A successful create resets it to the
//! schema's initial values, unless the user changed the form while the
//! request was in flight.

use crate::draft::DraftBuffer;
use crate::error::DraftError;
use mortgage_schema::{FieldSchema, RawRecord, TypedRecord, ValidationErrors};

/// Validated create request
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCreate {
    /// Form revision the payload was taken from
    pub revision: u64,
    /// Coerced payload
    pub record: TypedRecord,
}

/// Draft state of the creation form
#[derive(Debug, Clone)]
pub struct CreateForm {
    draft: DraftBuffer,
    initial: RawRecord,
    revision: u64,
    submitting: bool,
}

impl CreateForm {
    /// Create an empty form for `schema`
    #[must_use]
    pub fn new(schema: &FieldSchema) -> Self {
        let initial = schema.initial_record();
        Self {
            draft: DraftBuffer::new(initial.clone()),
            initial,
            revision: 0,
            submitting: false,
        }
    }

    /// Current draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &DraftBuffer {
        &self.draft
    }

    /// Current raw values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &RawRecord {
        self.draft.values()
    }

    /// Errors from the last submit attempt
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        self.draft.errors()
    }

    /// Check if a create request is awaiting the store
    #[inline]
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Check if the form holds its initial values
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.draft.values() == &self.initial
    }

    /// Change one field
    ///
    /// # Errors
    /// `DraftError::UnknownField` for names outside the schema.
    pub fn set_field(
        &mut self,
        schema: &FieldSchema,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        self.draft.set_field(schema, name, value)?;
        self.revision += 1;
        Ok(())
    }

    /// Validate the draft and mark the form as submitting
    ///
    /// # Errors
    /// - `DraftError::SubmitInFlight` if a create is already awaiting the store
    /// - `DraftError::Invalid` with the field errors
    pub fn begin_submit(&mut self, schema: &FieldSchema) -> Result<PendingCreate, DraftError> {
        if self.submitting {
            return Err(DraftError::SubmitInFlight);
        }
        let record = self.draft.validate(schema)?;
        self.submitting = true;
        Ok(PendingCreate {
            revision: self.revision,
            record,
        })
    }

    /// Settle a successful create
    ///
    /// Resets the form if nothing changed since `revision` was taken and
    /// returns whether it did.
    pub fn finish_submit(&mut self, revision: u64) -> bool {
        self.submitting = false;
        if self.revision != revision {
            tracing::debug!(
                submitted = revision,
                current = self.revision,
                "form changed during create, keeping input"
            );
            return false;
        }
        self.reset();
        true
    }

    /// Settle a failed create, keeping the draft
    pub fn fail_submit(&mut self) {
        self.submitting = false;
    }

    /// Restore initial values and clear errors
    pub fn reset(&mut self) {
        self.draft = DraftBuffer::new(self.initial.clone());
        self.revision += 1;
    }
}
