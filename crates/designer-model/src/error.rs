//! Error types for domain editing operations.
//!
//! Expected shape problems (missing names, incomplete lookups, server
//! validation failures) are data, not errors: see [`crate::FieldErrors`] and
//! [`crate::ValidationException`]. [`ModelError`] covers contract violations
//! by the caller.

use thiserror::Error;

use crate::property_type::PropertyType;

/// Caller contract violation in a domain operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// Row index outside the domain's field list.
    #[error("Row {index} is out of range for a domain with {len} fields")]
    RowOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of fields in the domain.
        len: usize,
    },

    /// Type change not offered for the field.
    #[error("Field '{field}' cannot change type from {from} to {to}")]
    IllegalTypeChange {
        /// Field name.
        field: String,
        /// Current type.
        from: PropertyType,
        /// Requested type.
        to: PropertyType,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
