//! Domain errors shared by value objects.

use thiserror::Error;

/// Domain-level errors raised while constructing or checking value objects.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Invalid value for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Arithmetic overflow while deriving a value.
    #[error("Arithmetic overflow computing '{field}'")]
    Overflow {
        /// Field being computed.
        field: String,
    },
}

impl DomainError {
    /// Name of the field the error refers to.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidValue { field, .. } | Self::Overflow { field } => field,
        }
    }
}
