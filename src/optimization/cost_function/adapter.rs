//! Adapter that exposes an `argmin` problem as a [`CostFunction`].
//!
//! Problems already written against argmin's `CostFunction`/`Gradient` traits
//! over `Array1<f64>` can be handed to the registration optimizers without
//! rewriting them. argmin errors are converted with `From<argmin::core::Error>`
//! and an argmin `NotImplemented` gradient is mapped onto
//! [`OptError::GradientNotImplemented`], so the finite-difference fallback of
//! gradient descent applies to it.
use crate::optimization::{
    cost_function::traits::CostFunction,
    errors::{OptError, OptResult},
    types::{Cost, Grad, Theta},
};
use argmin::core::{CostFunction as ArgminCostFunction, Gradient as ArgminGradient};

/// Bridges an argmin problem into the crate's [`CostFunction`].
///
/// argmin problems carry no notion of dimensionality, so the number of
/// parameters is supplied at construction.
#[derive(Debug, Clone)]
pub struct ArgminProblem<P> {
    problem: P,
    n_params: usize,
}

impl<P> ArgminProblem<P> {
    pub fn new(problem: P, n_params: usize) -> Self {
        Self { problem, n_params }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
}

impl<P> CostFunction for ArgminProblem<P>
where
    P: ArgminCostFunction<Param = Theta, Output = Cost>
        + ArgminGradient<Param = Theta, Gradient = Grad>
        + Sync,
{
    fn number_of_parameters(&self) -> usize {
        self.n_params
    }

    /// Evaluate argmin's `cost` at `position`.
    ///
    /// # Errors
    /// Any argmin error, converted into [`OptError`].
    fn value(&self, position: &Theta) -> OptResult<Cost> {
        Ok(self.problem.cost(position)?)
    }

    /// Evaluate argmin's `gradient` at `position`.
    ///
    /// # Errors
    /// - [`OptError::GradientNotImplemented`] when argmin reports
    ///   `NotImplemented`.
    /// - Any other argmin error, converted into [`OptError`].
    fn derivative(&self, position: &Theta) -> OptResult<Grad> {
        self.problem.gradient(position).map_err(|e| match OptError::from(e) {
            OptError::NotImplemented { .. } => OptError::GradientNotImplemented,
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::{ArgminError, Error};
    use ndarray::array;

    /// Rosenbrock with an analytic gradient.
    struct Rosenbrock;

    impl ArgminCostFunction for Rosenbrock {
        type Param = Theta;
        type Output = Cost;

        fn cost(&self, p: &Self::Param) -> Result<Self::Output, Error> {
            Ok((1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2))
        }
    }

    impl ArgminGradient for Rosenbrock {
        type Param = Theta;
        type Gradient = Grad;

        fn gradient(&self, p: &Self::Param) -> Result<Self::Gradient, Error> {
            Ok(array![
                -2.0 * (1.0 - p[0]) - 400.0 * p[0] * (p[1] - p[0] * p[0]),
                200.0 * (p[1] - p[0] * p[0])
            ])
        }
    }

    /// Value-only problem whose gradient is explicitly not implemented.
    struct NoGradient;

    impl ArgminCostFunction for NoGradient {
        type Param = Theta;
        type Output = Cost;

        fn cost(&self, p: &Self::Param) -> Result<Self::Output, Error> {
            if p[0] < 0.0 {
                return Err(OptError::MetricEvaluation { text: "negative".to_string() }.into());
            }
            Ok(p[0])
        }
    }

    impl ArgminGradient for NoGradient {
        type Param = Theta;
        type Gradient = Grad;

        fn gradient(&self, _p: &Self::Param) -> Result<Self::Gradient, Error> {
            Err(ArgminError::NotImplemented { text: "no gradient".to_string() }.into())
        }
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Value and gradient delegation to argmin problems.
    // - Mapping of argmin `NotImplemented` onto `GradientNotImplemented`.
    // - Recovery of crate errors raised from inside an argmin problem.
    // -------------------------------------------------------------------------

    #[test]
    fn delegates_value_and_gradient() {
        let f = ArgminProblem::new(Rosenbrock, 2);
        let p = array![1.0, 1.0];
        assert_eq!(f.number_of_parameters(), 2);
        assert_eq!(f.value(&p), Ok(0.0));
        assert_eq!(f.derivative(&p), Ok(array![0.0, 0.0]));
    }

    #[test]
    // Purpose
    // -------
    // An argmin problem without a gradient must trigger the crate's
    // finite-difference path rather than a hard failure.
    //
    // Given
    // -----
    // - A problem whose `gradient` returns `ArgminError::NotImplemented`.
    //
    // Expect
    // ------
    // - `derivative` returns `OptError::GradientNotImplemented`.
    fn not_implemented_gradient_maps_to_gradient_not_implemented() {
        // Arrange
        let f = ArgminProblem::new(NoGradient, 1);

        // Act
        let result = f.derivative(&array![1.0]);

        // Assert
        assert_eq!(result, Err(OptError::GradientNotImplemented));
    }

    #[test]
    fn metric_errors_raised_inside_argmin_problem_are_recovered() {
        let f = ArgminProblem::new(NoGradient, 1);
        assert_eq!(
            f.value(&array![-1.0]),
            Err(OptError::MetricEvaluation { text: "negative".to_string() })
        );
    }
}
