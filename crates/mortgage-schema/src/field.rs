//! Field schema registry
//!
//! Provides [`FieldSchema`], the ordered set of [`FieldSpec`] descriptors that
//! drives both the creation form and the list table. The order of the schema is
//! the order of form inputs and of table columns.

use crate::error::SchemaError;
use crate::record::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Numeric validation rule attached to a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum NumericRule {
    /// Whole number within an inclusive range (credit score)
    IntegerRange {
        /// Lowest accepted value
        min: i64,
        /// Highest accepted value
        max: i64,
    },

    /// Decimal strictly greater than zero
    Positive,

    /// Decimal that may be zero but never negative (outstanding debt)
    NonNegative,
}

impl NumericRule {
    /// Whether values under this rule are coerced to integers
    #[inline]
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::IntegerRange { .. })
    }
}

/// One selectable value of an enumerated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    /// Wire value
    pub value: String,
    /// Display label
    pub label: String,
}

impl EnumOption {
    /// Create option
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-text numeric input
    Numeric {
        /// Rule the parsed number must satisfy
        rule: NumericRule,
    },

    /// Closed set of options
    Enum {
        /// Allowed options, first one is the form default
        options: Vec<EnumOption>,
    },
}

/// Descriptor of one editable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    name: String,
    label: String,
    kind: FieldKind,
}

impl FieldSpec {
    /// Create numeric field
    #[must_use]
    pub fn numeric(name: impl Into<String>, label: impl Into<String>, rule: NumericRule) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Numeric { rule },
        }
    }

    /// Create enumerated field from `(value, label)` pairs
    #[must_use]
    pub fn enumeration<'a>(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Enum {
                options: options
                    .into_iter()
                    .map(|(value, label)| EnumOption::new(value, label))
                    .collect(),
            },
        }
    }

    /// Field name, used as the key in every record map
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Semantic kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Numeric rule, if this is a numeric field
    #[inline]
    #[must_use]
    pub fn numeric_rule(&self) -> Option<NumericRule> {
        match &self.kind {
            FieldKind::Numeric { rule } => Some(*rule),
            FieldKind::Enum { .. } => None,
        }
    }

    /// Enum options, empty for numeric fields
    #[must_use]
    pub fn options(&self) -> &[EnumOption] {
        match &self.kind {
            FieldKind::Enum { options } => options,
            FieldKind::Numeric { .. } => &[],
        }
    }

    /// Check whether `value` is one of the enum options
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }

    /// Raw value shown in a freshly reset creation form
    #[must_use]
    pub fn initial_value(&self) -> String {
        self.options()
            .first()
            .map(|o| o.value.clone())
            .unwrap_or_default()
    }
}

/// Ordered, immutable registry of field descriptors
///
/// Names are unique. The same instance is consumed by the validator, the
/// coercion step and every presentation surface, so a field added here shows
/// up in the same position everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Build a schema, rejecting duplicate names and empty enums
    ///
    /// # Errors
    /// - `SchemaError::Empty` if no fields are given
    /// - `SchemaError::DuplicateField` on a repeated name
    /// - `SchemaError::NoOptions` for an enum without options
    /// - `SchemaError::InvalidRange` for an integer range with `min > max`
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField(field.name().to_string()));
            }
            match field.kind() {
                FieldKind::Enum { options } if options.is_empty() => {
                    return Err(SchemaError::NoOptions(field.name().to_string()));
                }
                FieldKind::Numeric {
                    rule: NumericRule::IntegerRange { min, max },
                } if min > max => {
                    return Err(SchemaError::InvalidRange {
                        field: field.name().to_string(),
                        min: *min,
                        max: *max,
                    });
                }
                _ => {}
            }
        }

        Ok(Self { fields })
    }

    /// The mortgage application field set
    #[must_use]
    pub fn mortgage() -> Self {
        Self {
            fields: vec![
                FieldSpec::numeric(
                    "credit_score",
                    "Credit Score",
                    NumericRule::IntegerRange { min: 0, max: 850 },
                ),
                FieldSpec::numeric("loan_amount", "Loan Amount", NumericRule::Positive),
                FieldSpec::numeric("property_value", "Property Value", NumericRule::Positive),
                FieldSpec::numeric("annual_income", "Annual Income", NumericRule::Positive),
                FieldSpec::numeric("debt_amount", "Debt Amount", NumericRule::NonNegative),
                FieldSpec::enumeration(
                    "loan_type",
                    "Loan Type",
                    [("fixed", "Fixed"), ("adjustable", "Adjustable")],
                ),
                FieldSpec::enumeration(
                    "property_type",
                    "Property Type",
                    [("single_family", "Single Family"), ("condo", "Condo")],
                ),
            ],
        }
    }

    /// Fields in display order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Iterate fields in display order
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if a field exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a field, failing on unknown names
    ///
    /// # Errors
    /// `SchemaError::UnknownField` if no field has this name
    pub fn require(&self, name: &str) -> Result<&FieldSpec, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
    }

    /// Field names in display order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::name)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed schema
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw record for an empty creation form
    ///
    /// Numeric fields start blank, enum fields start at their first option.
    #[must_use]
    pub fn initial_record(&self) -> RawRecord {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.initial_value()))
            .collect()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::mortgage()
    }
}

impl TryFrom<Vec<FieldSpec>> for FieldSchema {
    type Error = SchemaError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldSchema> for Vec<FieldSpec> {
    fn from(schema: FieldSchema) -> Self {
        schema.fields
    }
}

impl<'a> IntoIterator for &'a FieldSchema {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
