//! Error types for sqlforge.

use thiserror::Error;

/// The main error type for statement generation.
///
/// Every variant is a precondition failure raised before any SQL is returned.
#[derive(Debug, Error)]
pub enum SqlGenError {
    /// Paging or windowing requested without an ORDER BY.
    #[error("Sort cannot be empty: paged and windowed selects need a deterministic order")]
    MissingSort,

    /// UPDATE or DELETE requested without a predicate.
    #[error("Predicate is required: unconditional UPDATE and DELETE are not generated")]
    MissingPredicate,

    /// No writable columns are left after key/ignore/read-only filtering.
    #[error("No columns were mapped for table '{table}'")]
    NoMappedColumns { table: String },

    /// A sort key or lookup named a property the mapping does not have.
    #[error("Could not find '{property}' in mapping for table '{table}'")]
    UnknownColumn { property: String, table: String },

    /// A property name matched more than one column case-insensitively.
    #[error("'{property}' matches more than one column in mapping for table '{table}'")]
    AmbiguousColumn { property: String, table: String },

    /// More than one trigger-identity key on a single mapping.
    #[error("TriggerIdentity cannot be used with multi-column keys ({count} on table '{table}')")]
    MultiColumnTriggerIdentityUnsupported { table: String, count: usize },

    /// A bulk insert was given no mappings or rows.
    #[error("Bulk insert requires at least one row")]
    EmptyBatch,

    /// A bulk update was given no predicates.
    #[error("Bulk update requires at least one predicate")]
    EmptyPredicateList,

    /// A dialect was asked to render a blank identifier.
    #[error("{0} name cannot be empty")]
    EmptyIdentifier(&'static str),

    /// The same parameter name was bound twice within one statement.
    #[error("Parameter '{0}' is already bound")]
    DuplicateParameter(String),

    /// A paging value does not fit the signed 64-bit range databases bind.
    #[error("Value for '{parameter}' is out of range")]
    OutOfRange { parameter: String },

    /// The dialect has no template for the requested feature.
    #[error("{dialect} does not support {feature}")]
    Unsupported {
        dialect: &'static str,
        feature: &'static str,
    },

    /// Configuration or mapping file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlGenError {
    /// Create an unknown column error.
    pub fn unknown_column(property: impl Into<String>, table: impl Into<String>) -> Self {
        Self::UnknownColumn {
            property: property.into(),
            table: table.into(),
        }
    }

    pub fn ambiguous_column(property: impl Into<String>, table: impl Into<String>) -> Self {
        Self::AmbiguousColumn {
            property: property.into(),
            table: table.into(),
        }
    }

    /// Create a no-mapped-columns error.
    pub fn no_columns(table: impl Into<String>) -> Self {
        Self::NoMappedColumns {
            table: table.into(),
        }
    }
}

/// Result type alias for sqlforge operations.
pub type SqlGenResult<T> = Result<T, SqlGenError>;
