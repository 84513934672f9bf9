//! Error types for schema construction and lookup

/// Schema errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Schema has no fields
    #[error("schema must declare at least one field")]
    Empty,

    /// Two fields share a name
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// Enumerated field without options
    #[error("enum field '{0}' has no options")]
    NoOptions(String),

    /// Integer range with min above max
    #[error("field '{field}' has an empty range [{min}, {max}]")]
    InvalidRange {
        /// Field name
        field: String,
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },

    /// Name not declared in the schema
    #[error("unknown field: {0}")]
    UnknownField(String),
}
