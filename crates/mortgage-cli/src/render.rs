//! Table rendering

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use mortgage_core::{EditorSnapshot, Notification, NotificationLevel};
use mortgage_schema::{FieldKind, FieldSchema, NumericRule, ValidationErrors};

/// Shown instead of an empty table
pub(crate) const EMPTY_LIST: &str = "No mortgages available.";

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if cfg!(test) {
        // stable width and no colour codes
        table.force_no_tty();
    }
    table
}

/// Record list: id, schema columns in order, then derived columns
pub(crate) fn records_table(snapshot: &EditorSnapshot, schema: &FieldSchema) -> String {
    if snapshot.is_empty() {
        return EMPTY_LIST.to_string();
    }
    let rows = snapshot.rows(schema);

    let mut derived: Vec<&str> = Vec::new();
    for row in &rows {
        for cell in &row.derived {
            if !derived.contains(&cell.field.as_str()) {
                derived.push(cell.field.as_str());
            }
        }
    }

    let mut table = new_table();
    let mut header = vec![Cell::new("ID")];
    header.extend(schema.iter().map(|f| Cell::new(f.label())));
    header.extend(derived.iter().map(|name| Cell::new(title_case(name))));
    table.set_header(header);

    for row in &rows {
        let mut cells = vec![Cell::new(row.id)];
        cells.extend(row.cells.iter().map(|c| Cell::new(&c.value)));
        cells.extend(derived.iter().map(|name| {
            let value = row
                .derived
                .iter()
                .find(|c| c.field == *name)
                .map(|c| c.value.as_str())
                .unwrap_or_default();
            Cell::new(value)
        }));
        table.add_row(cells);
    }
    table.to_string()
}

/// Field registry: name, label and accepted input
pub(crate) fn fields_table(schema: &FieldSchema) -> String {
    let mut table = new_table();
    table.set_header(vec!["Field", "Label", "Accepts"]);
    for field in schema {
        let accepted = accepts(field.kind());
        table.add_row(vec![field.name(), field.label(), accepted.as_str()]);
    }
    table.to_string()
}

fn accepts(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Numeric {
            rule: NumericRule::IntegerRange { min, max },
        } => format!("integer {min}..={max}"),
        FieldKind::Numeric {
            rule: NumericRule::Positive,
        } => "number > 0".to_string(),
        FieldKind::Numeric {
            rule: NumericRule::NonNegative,
        } => "number >= 0".to_string(),
        FieldKind::Enum { options } => options
            .iter()
            .map(|o| format!("{} ({})", o.value, o.label))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Field errors, one row each
pub(crate) fn errors_table(errors: &ValidationErrors) -> String {
    let mut table = new_table();
    table.set_header(vec!["Field", "Error"]);
    for (field, message) in errors.iter() {
        table.add_row(vec![
            Cell::new(field),
            Cell::new(message).fg(Color::Red),
        ]);
    }
    table.to_string()
}

/// One-line notification text
pub(crate) fn notification_line(notification: &Notification) -> String {
    let mark = match notification.level {
        NotificationLevel::Success => "\u{2713}",
        NotificationLevel::Failure => "\u{2717}",
    };
    format!("{mark} {}", notification.message)
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_core::{EditView, FormView, Operation};
    use mortgage_test_utils::persisted_records;

    fn snapshot(records: usize) -> EditorSnapshot {
        let schema = FieldSchema::mortgage();
        EditorSnapshot {
            records: persisted_records(records as u64),
            form: FormView {
                values: schema.initial_record(),
                errors: ValidationErrors::new(),
                submitting: false,
            },
            edit: EditView::Viewing,
        }
    }

    #[test]
    fn empty_list_message() {
        let schema = FieldSchema::mortgage();
        assert_eq!(records_table(&snapshot(0), &schema), EMPTY_LIST);
    }

    #[test]
    fn records_table_has_all_columns() {
        let schema = FieldSchema::mortgage();
        let text = records_table(&snapshot(2), &schema);
        for heading in ["ID", "Credit Score", "Property Type", "Credit Rating"] {
            assert!(text.contains(heading), "missing {heading}:\n{text}");
        }
        assert!(text.contains("610"));
        assert!(text.contains("620"));
        assert!(text.contains("300000"));
    }

    #[test]
    fn fields_table_lists_rules() {
        let text = fields_table(&FieldSchema::mortgage());
        assert!(text.contains("integer 0..=850"));
        assert!(text.contains("number >= 0"));
        assert!(text.contains("single_family (Single Family)"));
    }

    #[test]
    fn errors_table_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.insert("loan_amount", "loan amount must be greater than 0.");
        let text = errors_table(&errors);
        assert!(text.contains("loan_amount"));
        assert!(text.contains("loan amount must be greater than 0."));
    }

    #[test]
    fn notification_marks() {
        assert_eq!(
            notification_line(&Notification::failure(Operation::Delete)),
            "\u{2717} Error deleting mortgage"
        );
    }

    #[test]
    fn title_case_splits_underscores() {
        assert_eq!(title_case("individual_risk_score"), "Individual Risk Score");
    }
}
