//! Error types for association handling

use thiserror::Error;

use crate::validate::{Location, ValidationReport};

/// Main error type for association operations
#[derive(Debug, Error)]
pub enum AsnError {
    /// A required key is missing or a value is outside its enumeration
    #[error("Schema violation at {location}: {message}")]
    SchemaViolation { location: Location, message: String },

    /// A product does not hold exactly one SCIENCE member
    #[error("Invariant violation at {location}: {message}")]
    InvariantViolation { location: Location, message: String },

    /// Requested rule name is not registered
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// No product matches the given index or name
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// A built association failed validation
    #[error("Association failed validation: {0}")]
    Invalid(ValidationReport),

    /// Malformed pool table or pool entry
    #[error("Pool format error at line {line}: {message}")]
    PoolFormat { line: usize, message: String },

    /// The process-wide rule registry was installed twice
    #[error("Rule registry already installed")]
    RegistryAlreadyInstalled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AsnError {
    pub(crate) fn schema(location: Location, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            location,
            message: message.into(),
        }
    }

    pub(crate) fn invariant(location: Location, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            location,
            message: message.into(),
        }
    }
}

/// Result type alias for association operations
pub type Result<T> = std::result::Result<T, AsnError>;
