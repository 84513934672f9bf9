//! Draft buffer shared by the creation form and edit sessions

use crate::error::DraftError;
use mortgage_schema::{coerce, FieldSchema, RawRecord, TypedRecord, ValidationErrors};

/// In-progress text input plus the errors from its last validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftBuffer {
    values: RawRecord,
    errors: ValidationErrors,
}

impl DraftBuffer {
    /// Create buffer with initial values and no errors
    #[inline]
    #[must_use]
    pub fn new(values: RawRecord) -> Self {
        Self {
            values,
            errors: ValidationErrors::new(),
        }
    }

    /// Current raw values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &RawRecord {
        &self.values
    }

    /// Errors from the last validation pass
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Replace one field's raw value
    ///
    /// # Errors
    /// `DraftError::UnknownField` if the schema does not declare `name`.
    pub fn set_field(
        &mut self,
        schema: &FieldSchema,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        if !schema.contains(name) {
            return Err(DraftError::UnknownField(name.to_string()));
        }
        self.values.set(name, value);
        Ok(())
    }

    /// Validate and coerce the whole draft
    ///
    /// The stored errors are replaced by this pass's result, never merged.
    ///
    /// # Errors
    /// `DraftError::Invalid` carrying the field errors.
    pub fn validate(&mut self, schema: &FieldSchema) -> Result<TypedRecord, DraftError> {
        match coerce(&self.values, schema) {
            Ok(record) => {
                self.errors = ValidationErrors::new();
                Ok(record)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(DraftError::Invalid(errors))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_rejected() {
        let schema = FieldSchema::mortgage();
        let mut draft = DraftBuffer::new(schema.initial_record());
        let err = draft.set_field(&schema, "interest_rate", "4.5").unwrap_err();
        assert_eq!(err, DraftError::UnknownField("interest_rate".into()));
        assert!(draft.values().get("interest_rate").is_none());
    }

    #[test]
    fn errors_replaced_each_pass() {
        let schema = FieldSchema::mortgage();
        let mut draft = DraftBuffer::new(schema.initial_record());
        assert!(draft.validate(&schema).is_err());
        assert_eq!(draft.errors().len(), 5);

        for (name, value) in [
            ("credit_score", "640"),
            ("loan_amount", "1"),
            ("property_value", "2"),
            ("annual_income", "3"),
        ] {
            draft.set_field(&schema, name, value).unwrap();
        }
        assert!(draft.validate(&schema).is_err());
        let fields: Vec<&str> = draft.errors().fields().collect();
        assert_eq!(fields, vec!["debt_amount"]);

        draft.set_field(&schema, "debt_amount", "0").unwrap();
        assert!(draft.validate(&schema).is_ok());
        assert!(draft.errors().is_empty());
    }
}
