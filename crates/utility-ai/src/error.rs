//! Error types surfaced by curve construction and goal evaluation.
//!
//! Configuration errors (bad curve parameters) are raised while the goal
//! mapping is being built, before any tick runs. Runtime errors come out of
//! [`UtilityEvaluator::select`](crate::UtilityEvaluator::select) and abort
//! that evaluation.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error returned by fallible raw-measurement functions.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, UtilityError>;

/// Errors raised while building or evaluating scorers.
#[derive(Debug, Error)]
pub enum UtilityError {
    /// A curve parameter failed validation.
    #[error("invalid {parameter} for {curve} curve: {value}")]
    InvalidParameter {
        curve: &'static str,
        parameter: &'static str,
        value: f64,
    },

    /// A raw-measurement function returned an error.
    #[error("scorer `{name}` failed")]
    ScorerFailure {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Two distinct considerations share a name under strict naming.
    #[error("consideration name `{name}` is used by more than one consideration")]
    AmbiguousKey { name: String },
}

/// Coarse classification of a [`UtilityError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Invalid setup. Fix the goal mapping; retrying will not help.
    Configuration,

    /// A scorer broke while evaluating a context.
    Runtime,
}

impl ErrorSeverity {
    /// Lowercase label for logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Runtime => "runtime",
        }
    }
}

impl UtilityError {
    pub(crate) fn invalid_parameter(curve: &'static str, parameter: &'static str, value: f64) -> Self {
        Self::InvalidParameter {
            curve,
            parameter,
            value,
        }
    }

    pub(crate) fn scorer_failure(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ScorerFailure {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Classifies the error.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidParameter { .. } | Self::AmbiguousKey { .. } => {
                ErrorSeverity::Configuration
            }
            Self::ScorerFailure { .. } => ErrorSeverity::Runtime,
        }
    }
}
