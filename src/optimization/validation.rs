//! Validation helpers for the optimizer configuration and cost-function output.
//!
//! This module centralizes the consistency checks shared by the control core
//! and the step strategies:
//!
//! - **Configuration checks**: [`verify_learning_rate`], [`verify_gain`]
//!   reject non-finite or out-of-range tuning constants before a run starts.
//! - **Position checks**: [`validate_initial_position`] enforces dimension and
//!   finiteness of the caller's starting estimate.
//! - **Cost-function output**: [`validate_value`], [`validate_grad`] reject
//!   non-finite values and malformed derivatives so a corrupted update is
//!   never applied.
//!
//! All helpers report domain-specific [`OptError`] variants.
use crate::optimization::{
    errors::{OptError, OptResult},
    types::{Cost, Grad, Theta},
};

/// Validate a gradient-descent learning rate.
///
/// Zero is admissible (it yields a run that never moves).
///
/// # Errors
/// Returns [`OptError::InvalidLearningRate`] if the value is non-finite or < 0.
pub fn verify_learning_rate(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidLearningRate { value, reason: "Learning rate must be finite." });
    }
    if value < 0.0 {
        return Err(OptError::InvalidLearningRate {
            value,
            reason: "Learning rate must be non-negative.",
        });
    }
    Ok(())
}

/// Validate an SPSA gain constant.
///
/// - `allow_zero = false`: the value must be finite and strictly positive.
/// - `allow_zero = true`: the value must be finite and non-negative.
///
/// # Errors
/// Returns [`OptError::InvalidGain`] naming the offending constant.
pub fn verify_gain(name: &'static str, value: f64, allow_zero: bool) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidGain { name, value, reason: "Gain must be finite." });
    }
    if allow_zero && value < 0.0 {
        return Err(OptError::InvalidGain { name, value, reason: "Gain must be non-negative." });
    }
    if !allow_zero && value <= 0.0 {
        return Err(OptError::InvalidGain { name, value, reason: "Gain must be positive." });
    }
    Ok(())
}

/// Validate the caller's initial position against the search-space dimension.
///
/// # Errors
/// - [`OptError::PositionDimMismatch`] if `position.len() != dim`.
/// - [`OptError::InvalidInitialPosition`] for the first non-finite entry.
pub fn validate_initial_position(position: &Theta, dim: usize) -> OptResult<()> {
    if position.len() != dim {
        return Err(OptError::PositionDimMismatch { expected: dim, found: position.len() });
    }
    for (index, &value) in position.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidInitialPosition { index, value });
        }
    }
    Ok(())
}

/// Validate a derivative vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Derivative elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate that a scalar cost value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: Cost) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Learning-rate and gain range checks (zero handling in particular).
    // - Initial-position and derivative dimension/finiteness checks.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A zero learning rate is a legal (no-op) configuration, negatives are not.
    //
    // Given
    // -----
    // - Learning rates 0.0, 0.1, -0.1 and NaN.
    //
    // Expect
    // ------
    // - 0.0 and 0.1 accepted; -0.1 and NaN rejected with `InvalidLearningRate`.
    fn verify_learning_rate_accepts_zero_rejects_negative() {
        // Act / Assert
        assert!(verify_learning_rate(0.0).is_ok());
        assert!(verify_learning_rate(0.1).is_ok());
        assert!(matches!(
            verify_learning_rate(-0.1),
            Err(OptError::InvalidLearningRate { .. })
        ));
        assert!(matches!(
            verify_learning_rate(f64::NAN),
            Err(OptError::InvalidLearningRate { .. })
        ));
    }

    #[test]
    fn verify_gain_respects_allow_zero() {
        assert!(verify_gain("A", 0.0, true).is_ok());
        assert!(matches!(verify_gain("a", 0.0, false), Err(OptError::InvalidGain { name: "a", .. })));
        assert!(matches!(verify_gain("A", -1.0, true), Err(OptError::InvalidGain { .. })));
        assert!(matches!(
            verify_gain("gamma", f64::INFINITY, false),
            Err(OptError::InvalidGain { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Initial positions must match the cost-function dimension and be finite.
    //
    // Given
    // -----
    // - A 2-vector checked against dimension 3.
    // - A 2-vector with a NaN entry checked against dimension 2.
    //
    // Expect
    // ------
    // - `PositionDimMismatch` and `InvalidInitialPosition { index: 1 }`.
    fn validate_initial_position_checks_dimension_and_finiteness() {
        // Arrange
        let short = array![0.0, 1.0];
        let with_nan = array![0.0, f64::NAN];

        // Act / Assert
        assert_eq!(
            validate_initial_position(&short, 3),
            Err(OptError::PositionDimMismatch { expected: 3, found: 2 })
        );
        assert!(matches!(
            validate_initial_position(&with_nan, 2),
            Err(OptError::InvalidInitialPosition { index: 1, .. })
        ));
    }

    #[test]
    fn validate_grad_reports_first_non_finite_entry() {
        let grad = array![1.0, f64::INFINITY, f64::NAN];
        assert!(matches!(validate_grad(&grad, 3), Err(OptError::InvalidGradient { index: 1, .. })));
        assert_eq!(
            validate_grad(&grad, 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    fn validate_value_rejects_nan() {
        assert!(validate_value(-3.5).is_ok());
        assert!(matches!(validate_value(f64::NAN), Err(OptError::NonFiniteCost { .. })));
    }
}
