//! Error type shared by every module of the crate.

/// Errors that can occur while building a method or integrating a problem
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Two vectors of different length were combined
    #[error("dimension mismatch: expected length {expected}, found {found}")]
    DimensionMismatch {
        /// Length of the left-hand operand
        expected: usize,
        /// Length of the right-hand operand
        found: usize,
    },

    /// Tableau coefficients have inconsistent shapes or are not explicit
    #[error("invalid tableau: {reason}")]
    InvalidTableau {
        /// Which check failed
        reason: String,
    },

    /// Invalid input parameters
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },

    /// Step budget exhausted before reaching the end of the domain
    #[error("maximum number of integration steps ({steps}) exceeded at x = {x}")]
    MaxStepsExceeded {
        /// Number of steps taken
        steps: usize,
        /// Independent variable when the budget ran out
        x: f64,
    },

    /// Non-finite state detected during integration
    #[error("non-finite state detected at x = {x}")]
    NonFiniteState {
        /// Independent variable at which the state became NaN or infinite
        x: f64,
    },

    /// Step size became NaN, infinite or non-positive
    #[error("step size {h} is not a positive finite number at x = {x}")]
    StepNotFinite {
        /// Independent variable at which the step was computed
        x: f64,
        /// The offending step size
        h: f64,
    },

    /// Trace or period-end record accessed past its end
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of stored entries
        len: usize,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_tableau(reason: impl Into<String>) -> Self {
        Error::InvalidTableau {
            reason: reason.into(),
        }
    }
}
