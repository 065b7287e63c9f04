//! Error types for Aislar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Aislar operations.
///
/// Provides detailed context about failures including shape mismatches,
/// invalid hyperparameters, unsupported sparse layouts, and calls on
/// unfitted models.
///
/// # Examples
///
/// ```
/// use aislar::error::AislarError;
///
/// let err = AislarError::DimensionMismatch {
///     expected: "100x10".to_string(),
///     actual: "100x5".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum AislarError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Malformed input data (empty matrix, non-finite values, bad weights).
    InvalidInput {
        /// Description of the problem
        message: String,
    },

    /// Sparse layout not accepted by this operation.
    UnsupportedSparseLayout {
        /// Layout that was passed
        found: String,
        /// Layouts the operation accepts
        accepted: String,
    },

    /// Operation not meaningful for this estimator family.
    UnsupportedOperation {
        /// Operation name
        operation: String,
        /// Why it is not supported
        reason: String,
    },

    /// Model method called before a successful `fit`.
    NotFitted {
        /// Estimator type name
        estimator: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AislarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AislarError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            AislarError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            AislarError::InvalidInput { message } => {
                write!(f, "Invalid input: {message}")
            }
            AislarError::UnsupportedSparseLayout { found, accepted } => {
                write!(
                    f,
                    "Unsupported sparse layout: got {found}, accepted: {accepted}"
                )
            }
            AislarError::UnsupportedOperation { operation, reason } => {
                write!(f, "Unsupported operation: {operation} ({reason})")
            }
            AislarError::NotFitted { estimator } => {
                write!(f, "{estimator} is not fitted. Call fit() first.")
            }
            AislarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AislarError {}

impl From<&str> for AislarError {
    fn from(msg: &str) -> Self {
        AislarError::Other(msg.to_string())
    }
}

impl From<String> for AislarError {
    fn from(msg: String) -> Self {
        AislarError::Other(msg)
    }
}

impl AislarError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::InvalidInput {
            message: format!("empty input: {context}"),
        }
    }

    /// Create a not-fitted error for the named estimator
    #[must_use]
    pub fn not_fitted(estimator: &str) -> Self {
        Self::NotFitted {
            estimator: estimator.to_string(),
        }
    }

    /// Create an unsupported-operation error
    #[must_use]
    pub fn unsupported_operation(operation: &str, reason: &str) -> Self {
        Self::UnsupportedOperation {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for AislarError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<AislarError> for &str {
    fn eq(&self, other: &AislarError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, AislarError>;
