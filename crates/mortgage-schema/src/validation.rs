//! Field-level validation and coercion
//!
//! [`validate`] maps a [`RawRecord`] to [`ValidationErrors`]; [`coerce`] runs
//! the same checks and, when every field passes, produces a [`TypedRecord`].
//! Both share [`check_field`], so a record that validates clean always coerces.

use crate::field::{FieldKind, FieldSchema, FieldSpec, NumericRule};
use crate::record::{RawRecord, TypedRecord, TypedValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field name to human-readable message, in schema order
///
/// Empty means the record is ready for coercion and submission. A fresh
/// instance is produced by every validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("{}", join_messages(.errors))]
pub struct ValidationErrors {
    errors: IndexMap<String, String>,
}

impl ValidationErrors {
    /// Create empty error set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    /// Message for a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Check if a field has an error
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Iterate `(field, message)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names of fields with errors
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Number of failing fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when the record may be submitted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn join_messages(errors: &IndexMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate every schema field of `raw` in one pass
///
/// Pure and deterministic. Fields absent from `raw` are treated as blank
/// input; keys the schema does not declare are ignored.
#[must_use]
pub fn validate(raw: &RawRecord, schema: &FieldSchema) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in schema {
        if let Err(message) = check_field(field, raw.get(field.name()).unwrap_or("")) {
            errors.insert(field.name(), message);
        }
    }
    errors
}

/// Validate and convert `raw` into a typed payload
///
/// # Errors
/// Returns the full [`ValidationErrors`] if any field fails.
pub fn coerce(raw: &RawRecord, schema: &FieldSchema) -> Result<TypedRecord, ValidationErrors> {
    let mut values = IndexMap::with_capacity(schema.len());
    let mut errors = ValidationErrors::new();

    for field in schema {
        match check_field(field, raw.get(field.name()).unwrap_or("")) {
            Ok(value) => {
                values.insert(field.name().to_string(), value);
            }
            Err(message) => errors.insert(field.name(), message),
        }
    }

    if errors.is_empty() {
        Ok(TypedRecord::from_values(values))
    } else {
        Err(errors)
    }
}

/// Check one raw input against its field descriptor
///
/// # Errors
/// Returns the user-facing message when the input is not acceptable.
pub fn check_field(field: &FieldSpec, input: &str) -> Result<TypedValue, String> {
    match field.kind() {
        FieldKind::Numeric { rule } => check_numeric(field, *rule, input),
        FieldKind::Enum { options } => {
            if field.allows(input) {
                Ok(TypedValue::Text(input.to_string()))
            } else {
                let allowed: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
                Err(format!(
                    "{} must be one of: {}.",
                    field.label(),
                    allowed.join(", ")
                ))
            }
        }
    }
}

fn check_numeric(field: &FieldSpec, rule: NumericRule, input: &str) -> Result<TypedValue, String> {
    match rule {
        NumericRule::IntegerRange { min, max } => parse_integer(input)
            .filter(|v| (min..=max).contains(v))
            .map(TypedValue::Integer)
            .ok_or_else(|| {
                format!(
                    "{} must be between {min} and {max}.",
                    sentence_name(field.name())
                )
            }),
        NumericRule::Positive => parse_decimal(input)
            .filter(|v| *v > 0.0)
            .map(TypedValue::Float)
            .ok_or_else(|| format!("{} must be greater than 0.", spaced_name(field.name()))),
        NumericRule::NonNegative => parse_decimal(input)
            .filter(|v| *v >= 0.0)
            // -0.0 passes the comparison; store it as 0.0
            .map(|v| TypedValue::Float(v + 0.0))
            .ok_or_else(|| {
                format!(
                    "{} must be 0 or a positive number.",
                    sentence_name(field.name())
                )
            }),
    }
}

/// Parse a whole number; surrounding whitespace is ignored
#[must_use]
pub fn parse_integer(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

/// Parse a finite decimal; surrounding whitespace is ignored
#[must_use]
pub fn parse_decimal(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn spaced_name(name: &str) -> String {
    name.replace('_', " ")
}

fn sentence_name(name: &str) -> String {
    let spaced = spaced_name(name);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid() -> RawRecord {
        RawRecord::from_pairs([
            ("credit_score", "700"),
            ("loan_amount", "300000"),
            ("property_value", "350000"),
            ("annual_income", "85000"),
            ("debt_amount", "0"),
            ("loan_type", "fixed"),
            ("property_type", "condo"),
        ])
    }

    #[test]
    fn valid_record_has_no_errors() {
        let errors = validate(&valid(), &FieldSchema::mortgage());
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn valid_record_coerces() {
        let typed = coerce(&valid(), &FieldSchema::mortgage()).unwrap();
        let pairs: Vec<(&str, &TypedValue)> = typed.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("credit_score", &TypedValue::Integer(700)),
                ("loan_amount", &TypedValue::Float(300_000.0)),
                ("property_value", &TypedValue::Float(350_000.0)),
                ("annual_income", &TypedValue::Float(85_000.0)),
                ("debt_amount", &TypedValue::Float(0.0)),
                ("loan_type", &TypedValue::Text("fixed".into())),
                ("property_type", &TypedValue::Text("condo".into())),
            ]
        );
    }

    #[test]
    fn score_out_of_range() {
        let raw = valid().with("credit_score", "900");
        let errors = validate(&raw, &FieldSchema::mortgage());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("credit_score"),
            Some("Credit score must be between 0 and 850.")
        );
    }

    #[test]
    fn score_bounds_inclusive() {
        let schema = FieldSchema::mortgage();
        for ok in ["0", "850", " 425 "] {
            assert!(validate(&valid().with("credit_score", ok), &schema).is_empty());
        }
        for bad in ["-1", "851", "700.5", "", "abc", "7e2"] {
            let errors = validate(&valid().with("credit_score", bad), &schema);
            assert!(errors.contains("credit_score"), "accepted {bad:?}");
        }
    }

    #[test]
    fn loan_amount_zero_rejected_debt_zero_accepted() {
        let raw = valid().with("loan_amount", "0").with("debt_amount", "0");
        let errors = validate(&raw, &FieldSchema::mortgage());
        assert_eq!(
            errors.get("loan_amount"),
            Some("loan amount must be greater than 0.")
        );
        assert!(!errors.contains("debt_amount"));
    }

    #[test]
    fn negative_debt_rejected() {
        let raw = valid().with("debt_amount", "-5");
        let errors = validate(&raw, &FieldSchema::mortgage());
        assert_eq!(
            errors.get("debt_amount"),
            Some("Debt amount must be 0 or a positive number.")
        );
    }

    #[test]
    fn negative_zero_debt_coerces_to_zero() {
        let typed = coerce(&valid().with("debt_amount", "-0"), &FieldSchema::mortgage()).unwrap();
        match typed.get("debt_amount") {
            Some(TypedValue::Float(v)) => assert!(v.is_sign_positive()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_finite_numbers_rejected() {
        let schema = FieldSchema::mortgage();
        for bad in ["NaN", "inf", "-inf", "infinity"] {
            let errors = validate(&valid().with("annual_income", bad), &schema);
            assert!(errors.contains("annual_income"), "accepted {bad:?}");
        }
    }

    #[test]
    fn all_violations_collected() {
        let raw = RawRecord::new();
        let errors = validate(&raw, &FieldSchema::mortgage());
        assert_eq!(errors.len(), 7);
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields[0], "credit_score");
        assert_eq!(fields[6], "property_type");
    }

    #[test]
    fn enum_outside_options_rejected() {
        let raw = valid().with("loan_type", "balloon");
        let errors = validate(&raw, &FieldSchema::mortgage());
        assert_eq!(
            errors.get("loan_type"),
            Some("Loan Type must be one of: fixed, adjustable.")
        );
    }

    #[test]
    fn unknown_keys_ignored() {
        let raw = valid().with("credit_rating", "AAA");
        assert!(validate(&raw, &FieldSchema::mortgage()).is_empty());
        let typed = coerce(&raw, &FieldSchema::mortgage()).unwrap();
        assert!(typed.get("credit_rating").is_none());
    }

    #[test]
    fn coerce_returns_same_errors_as_validate() {
        let raw = valid().with("loan_amount", "-1").with("credit_score", "x");
        let schema = FieldSchema::mortgage();
        assert_eq!(coerce(&raw, &schema).unwrap_err(), validate(&raw, &schema));
    }

    #[test]
    fn errors_display_joins_fields() {
        let mut errors = ValidationErrors::new();
        errors.insert("a", "bad");
        errors.insert("b", "worse");
        assert_eq!(errors.to_string(), "a: bad; b: worse");

        let boxed: Box<dyn std::error::Error> = Box::new(errors);
        assert!(boxed.source().is_none());
        assert_eq!(boxed.to_string(), "a: bad; b: worse");
    }
}
