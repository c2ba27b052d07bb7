//! Error types for numerical operations.

use thiserror::Error;

/// A specialized Result type for numerical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during numerical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Root-finding algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Linear system has no unique solution, or too few reliable digits.
    #[error("Singular system: reciprocal condition {rcond:.2e} is not above tolerance {tolerance:.2e}")]
    SingularSystem {
        /// Reciprocal condition number of the column-scaled system; 0 when
        /// elimination met a zero pivot.
        rcond: f64,
        /// Minimum reciprocal condition number that was required.
        tolerance: f64,
    },

    /// Unrecognized configuration value.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the rejected value.
        reason: String,
    },

    /// Operation exists but has no implementation.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// The unavailable feature.
        feature: String,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Creates an unsupported feature error.
    #[must_use]
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    /// Returns true for the singular-system condition.
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularSystem { .. })
    }
}
