//! Mortgage Schema
//!
//! Field descriptors and record shapes shared by every surface of the editor.
//!
//! # Overview
//!
//! - **FieldSchema**: ordered registry of typed field descriptors
//! - **RawRecord / TypedRecord / PersistedRecord**: input, payload and stored snapshot
//! - **validate / coerce**: one-pass field checks and typed conversion
//!
//! # Example
//!
//! ```rust
//! use mortgage_schema::{coerce, validate, FieldSchema, RawRecord, TypedValue};
//!
//! let schema = FieldSchema::mortgage();
//! let raw = RawRecord::from_pairs([
//!     ("credit_score", "700"),
//!     ("loan_amount", "300000"),
//!     ("property_value", "350000"),
//!     ("annual_income", "85000"),
//!     ("debt_amount", "0"),
//!     ("loan_type", "fixed"),
//!     ("property_type", "condo"),
//! ]);
//!
//! assert!(validate(&raw, &schema).is_empty());
//! let typed = coerce(&raw, &schema).unwrap();
//! assert_eq!(typed.get("credit_score"), Some(&TypedValue::Integer(700)));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod field;
pub mod record;
pub mod validation;

// Re-exports
pub use error::SchemaError;
pub use field::{EnumOption, FieldKind, FieldSchema, FieldSpec, NumericRule};
pub use record::{stringify, PersistedRecord, RawRecord, RecordId, TypedRecord, TypedValue};
pub use validation::{check_field, coerce, validate, ValidationErrors};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for schema operations
    pub use crate::{
        coerce, validate, FieldKind, FieldSchema, FieldSpec, NumericRule, PersistedRecord,
        RawRecord, RecordId, TypedRecord, TypedValue, ValidationErrors,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
