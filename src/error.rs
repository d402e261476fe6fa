//! Error types for qubify operations.
//!
//! Configuration mistakes, coercion failures and failing user functions
//! surface here. Capacity and environment conditions are only warnings and
//! never become a [`QubifyError`].

use thiserror::Error;

/// Boxed error produced by a fallible user function.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for qubify operations.
///
/// # Examples
///
/// ```
/// use qubify::error::QubifyError;
///
/// let err = QubifyError::UnknownPenaltyMethod {
///     name: "max".to_string(),
/// };
/// assert!(err.to_string().contains("Unknown penalty method"));
/// ```
#[derive(Error, Debug)]
pub enum QubifyError {
    /// Penalty weight strategy name is not one of the supported methods.
    #[error("Unknown penalty method: {name} (expected one of: sum, pnform, verma_lewis)")]
    UnknownPenaltyMethod {
        /// Name that was requested
        name: String,
    },

    /// Search space description is malformed.
    #[error("Invalid search space: {reason}")]
    InvalidSearchSpace {
        /// What is wrong with the description
        reason: String,
    },

    /// Invalid configuration value provided.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Sizes of matrices, vectors or coefficient tables don't agree.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A coefficient is neither a finite number nor a symbolic expression.
    #[error("Cannot coerce coefficient {position} to a numeric value: {reason}")]
    Coercion {
        /// Position in the coefficient table
        position: usize,
        /// Why coercion failed
        reason: String,
    },

    /// Operation requires a purely numeric quadratic form.
    #[error("Symbolic quadratic forms are not supported by {operation}")]
    SymbolicUnsupported {
        /// Operation that was requested
        operation: String,
    },

    /// User function failed while being evaluated.
    #[error("Function evaluation failed: {0}")]
    Evaluation(#[source] BoxedError),

    /// A value cannot be represented by its binary encoding.
    #[error("Cannot encode variable '{label}': {reason}")]
    Encoding {
        /// Variable label
        label: String,
        /// Why encoding failed
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QubifyError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Wrap the failure of a user function.
    pub fn evaluation<E>(err: E) -> Self
    where
        E: Into<BoxedError>,
    {
        Self::Evaluation(err.into())
    }

    /// Create a search space error.
    #[must_use]
    pub fn invalid_search_space(reason: impl Into<String>) -> Self {
        Self::InvalidSearchSpace {
            reason: reason.into(),
        }
    }

    /// Whether this error is a configuration error (fatal, never retried).
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownPenaltyMethod { .. }
                | Self::InvalidSearchSpace { .. }
                | Self::InvalidHyperparameter { .. }
        )
    }
}

impl From<serde_json::Error> for QubifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for QubifyError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, QubifyError>;
