//! The cost-function contract consumed by the optimizers.
//!
//! A cost function maps a parameter vector to a scalar similarity value and,
//! optionally, its derivative. Implementations signal an infeasible position
//! (samples outside the image domain, too few valid samples, …) by returning
//! an error, typically [`OptError::MetricEvaluation`]; the control core turns
//! any such error into a terminal `MetricEvaluationError` for the run.
use crate::optimization::{
    errors::{OptError, OptResult},
    types::{Cost, Grad, Theta},
};

/// User-implemented objective.
///
/// Required:
/// - `number_of_parameters() -> usize`: search-space dimension; queried once
///   before a run and assumed constant for its duration.
/// - `value(&Theta) -> OptResult<Cost>`: evaluate the cost.
///
/// Optional:
/// - `derivative(&Theta) -> OptResult<Grad>`: analytic derivative. When not
///   implemented, gradient descent falls back to finite differences.
/// - `value_and_derivative(&Theta)`: combined form for implementations that
///   compute both in one pass. The default asks for the derivative first and
///   evaluates the value only once a derivative exists, so a value-only
///   function reports `GradientNotImplemented` without being evaluated.
///
/// `Sync` is required so the worker-pool derivative evaluation can share the
/// function across threads.
pub trait CostFunction: Sync {
    fn number_of_parameters(&self) -> usize;

    fn value(&self, position: &Theta) -> OptResult<Cost>;

    fn derivative(&self, _position: &Theta) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn value_and_derivative(&self, position: &Theta) -> OptResult<(Cost, Grad)> {
        let derivative = self.derivative(position)?;
        let value = self.value(position)?;
        Ok((value, derivative))
    }
}

impl<T: CostFunction + ?Sized> CostFunction for &T {
    fn number_of_parameters(&self) -> usize {
        (**self).number_of_parameters()
    }

    fn value(&self, position: &Theta) -> OptResult<Cost> {
        (**self).value(position)
    }

    fn derivative(&self, position: &Theta) -> OptResult<Grad> {
        (**self).derivative(position)
    }

    fn value_and_derivative(&self, position: &Theta) -> OptResult<(Cost, Grad)> {
        (**self).value_and_derivative(position)
    }
}
