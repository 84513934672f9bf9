//! Read-only state for the presentation layer
//!
//! [`EditorSnapshot`] is a copy of everything a renderer needs: the record
//! list, the creation form and the edit session. Rows come out in list order
//! with cells in schema order, so form and table columns always line up.

use mortgage_schema::{stringify, FieldSchema, PersistedRecord, RawRecord, RecordId, ValidationErrors};
use serde::Serialize;

/// Creation form state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Raw input
    pub values: RawRecord,
    /// Errors from the last submit
    pub errors: ValidationErrors,
    /// Create awaiting the store
    pub submitting: bool,
}

/// Edit session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditView {
    /// No row is being edited
    Viewing,
    /// One row has an open draft
    Editing {
        /// Row being edited
        target: RecordId,
        /// Draft input
        values: RawRecord,
        /// Errors from the last save
        errors: ValidationErrors,
        /// Save awaiting the store
        saving: bool,
    },
}

impl EditView {
    /// Row being edited
    #[must_use]
    pub fn target(&self) -> Option<RecordId> {
        match self {
            Self::Viewing => None,
            Self::Editing { target, .. } => Some(*target),
        }
    }
}

/// One table cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Column name
    pub field: String,
    /// Text shown
    pub value: String,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Record id
    pub id: RecordId,
    /// Schema columns, draft values when `editing`
    pub cells: Vec<Cell>,
    /// Server-derived columns, always the stored values
    pub derived: Vec<Cell>,
    /// Row has the open edit session
    pub editing: bool,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorSnapshot {
    /// Records from the last applied refresh
    pub records: Vec<PersistedRecord>,
    /// Creation form
    pub form: FormView,
    /// Edit session
    pub edit: EditView,
}

impl EditorSnapshot {
    /// Table rows in list order
    #[must_use]
    pub fn rows(&self, schema: &FieldSchema) -> Vec<RowView> {
        self.records
            .iter()
            .map(|record| self.row(record, schema))
            .collect()
    }

    fn row(&self, record: &PersistedRecord, schema: &FieldSchema) -> RowView {
        let draft = match &self.edit {
            EditView::Editing { target, values, .. } if *target == record.id() => Some(values),
            _ => None,
        };

        let cells = schema
            .names()
            .map(|name| Cell {
                field: name.to_string(),
                value: match draft {
                    Some(values) => values.get(name).unwrap_or_default().to_string(),
                    None => record.display_value(name),
                },
            })
            .collect();

        let derived = record
            .derived(schema)
            .map(|(name, value)| Cell {
                field: name.to_string(),
                value: stringify(value),
            })
            .collect();

        RowView {
            id: record.id(),
            cells,
            derived,
            editing: draft.is_some(),
        }
    }

    /// Check if the list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64) -> PersistedRecord {
        serde_json::from_value(json!({
            "id": id,
            "credit_score": 700,
            "loan_amount": 1000.0,
            "property_value": 2000.0,
            "annual_income": 3000.0,
            "debt_amount": 0.0,
            "loan_type": "fixed",
            "property_type": "condo",
            "credit_rating": "BBB"
        }))
        .unwrap()
    }

    fn snapshot(edit: EditView) -> EditorSnapshot {
        let schema = FieldSchema::mortgage();
        EditorSnapshot {
            records: vec![record(1), record(2)],
            form: FormView {
                values: schema.initial_record(),
                errors: ValidationErrors::new(),
                submitting: false,
            },
            edit,
        }
    }

    #[test]
    fn rows_follow_schema_order() {
        let schema = FieldSchema::mortgage();
        let rows = snapshot(EditView::Viewing).rows(&schema);
        assert_eq!(rows.len(), 2);

        let columns: Vec<&str> = rows[0].cells.iter().map(|c| c.field.as_str()).collect();
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(columns, names);
        assert_eq!(rows[0].cells[1].value, "1000");
        assert_eq!(rows[0].derived[0].value, "BBB");
        assert!(!rows[0].editing);
    }

    #[test]
    fn editing_row_shows_draft() {
        let schema = FieldSchema::mortgage();
        let values = record(2).to_raw(&schema).with("loan_amount", "1500");
        let rows = snapshot(EditView::Editing {
            target: RecordId(2),
            values,
            errors: ValidationErrors::new(),
            saving: false,
        })
        .rows(&schema);

        assert!(!rows[0].editing);
        assert_eq!(rows[0].cells[1].value, "1000");
        assert!(rows[1].editing);
        assert_eq!(rows[1].cells[1].value, "1500");
        assert_eq!(rows[1].derived[0].value, "BBB");
    }
}
