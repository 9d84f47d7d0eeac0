use argmin::core::{ArgminError, Error};

use crate::optimization::control::types::RunState;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Cost function ----
    /// The cost function could not be evaluated at the requested position
    /// (e.g. samples mapped outside the valid image domain).
    MetricEvaluation {
        text: String,
    },

    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    /// Implies that finite differences should be used.
    GradientNotImplemented,

    /// Derivative dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Derivative elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Scales ----
    /// Scale entries must be finite and strictly positive.
    InvalidScale {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Scale vector length does not match the number of parameters.
    ScaleDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Rigid default scales exist only for 2-D and 3-D transforms.
    UnsupportedSpaceDimension {
        dimension: usize,
    },

    // ---- Configuration ----
    /// The cost function reports zero parameters.
    EmptyParameterSpace,

    /// No initial position was supplied before the run.
    MissingInitialPosition,

    /// Initial position length does not match the number of parameters.
    PositionDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Initial position entries must be finite.
    InvalidInitialPosition {
        index: usize,
        value: f64,
    },

    /// Learning rate must be finite and non-negative.
    InvalidLearningRate {
        value: f64,
        reason: &'static str,
    },

    /// SPSA gain constant outside its admissible range.
    InvalidGain {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    // ---- Lifecycle ----
    /// Operation not allowed in the current run state.
    InvalidRunState {
        operation: &'static str,
        state: RunState,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Cost function ----
            OptError::MetricEvaluation { text } => {
                write!(f, "Metric evaluation failed: {text}")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::GradientNotImplemented => {
                write!(f, "Derivative not implemented by the cost function")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Derivative dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid derivative at index {index}: {value}: {reason}")
            }

            // ---- Scales ----
            OptError::InvalidScale { index, value, reason } => {
                write!(f, "Invalid scale at index {index}: {value}: {reason}")
            }
            OptError::ScaleDimMismatch { expected, found } => {
                write!(f, "Scale dimension mismatch: expected {expected}, found {found}")
            }
            OptError::UnsupportedSpaceDimension { dimension } => {
                write!(f, "No rigid default scales for space dimension {dimension}")
            }

            // ---- Configuration ----
            OptError::EmptyParameterSpace => {
                write!(f, "Cost function has no parameters")
            }
            OptError::MissingInitialPosition => {
                write!(f, "Missing initial position")
            }
            OptError::PositionDimMismatch { expected, found } => {
                write!(f, "Initial position dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidInitialPosition { index, value } => {
                write!(f, "Invalid initial position at index {index}: {value}, must be finite")
            }
            OptError::InvalidLearningRate { value, reason } => {
                write!(f, "Invalid learning rate {value}: {reason}")
            }
            OptError::InvalidGain { name, value, reason } => {
                write!(f, "Invalid SPSA gain '{name}' = {value}: {reason}")
            }

            // ---- Lifecycle ----
            OptError::InvalidRunState { operation, state } => {
                write!(f, "Cannot {operation} while the optimizer is {state}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

/// Argmin problems may box an [`OptError`] inside their error; that value is
/// recovered as-is before the argmin taxonomy is consulted.
impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Conversion of argmin errors into `OptError`, including recovery of an
    //   `OptError` boxed inside an argmin error.
    // - Display formatting of lifecycle errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure an `OptError` travelling through argmin's error type comes back
    // unchanged.
    //
    // Given
    // -----
    // - `OptError::MetricEvaluation` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::from` yields the identical variant and text.
    fn from_argmin_error_recovers_boxed_opt_error() {
        // Arrange
        let original = OptError::MetricEvaluation { text: "outside mask".to_string() };
        let boxed: Error = original.clone().into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // Verify argmin's own error taxonomy is mapped onto the wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::NotImplemented` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::NotImplemented` carrying the original text.
    fn from_argmin_error_maps_not_implemented() {
        // Arrange
        let boxed: Error = ArgminError::NotImplemented { text: "gradient".to_string() }.into();

        // Act
        let mapped = OptError::from(boxed);

        // Assert
        assert_eq!(mapped, OptError::NotImplemented { text: "gradient".to_string() });
    }

    #[test]
    fn invalid_run_state_display_names_operation_and_state() {
        let err = OptError::InvalidRunState { operation: "resume", state: RunState::Idle };
        assert_eq!(err.to_string(), "Cannot resume while the optimizer is idle");
    }
}
