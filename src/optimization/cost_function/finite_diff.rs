//! cost_function::finite_diff: derivative evaluation strategies.
//!
//! Purpose
//! -------
//! Give gradient descent one entry point for "value and derivative at θ"
//! regardless of whether the cost function supplies an analytic derivative,
//! and select between a sequential and a worker-pool evaluation of the
//! finite-difference fallback.
//!
//! Key behaviors
//! -------------
//! - [`DerivativeEvaluation::value_and_derivative`] calls the cost function's
//!   combined form first. Only `GradientNotImplemented` triggers the
//!   finite-difference path; every other error is returned as-is.
//! - The default combined form reports `GradientNotImplemented` before it
//!   evaluates anything, so the fallback costs `1 + 2n` evaluations per call
//!   for `n` parameters.
//! - `Sequential` uses `finitediff`'s central differences, routing any
//!   evaluation error through a `RefCell` side channel because the
//!   differencing closure must return a plain `f64`.
//! - `WorkerPool` computes the same central differences with `rayon`, one
//!   component per task. Each task perturbs a private copy of the position
//!   and writes exactly one output slot, so no locking is needed.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both paths use the step `h = sqrt(f64::EPSILON)` and the formula
//!   `(f(θ + h·e_i) − f(θ − h·e_i)) / (2h)`; switching the flag changes
//!   evaluation speed, never the numerical result.
//! - Returned derivatives satisfy [`validate_grad`].
use crate::optimization::{
    cost_function::traits::CostFunction,
    errors::{OptError, OptResult},
    types::{Cost, Grad, Theta},
    validation::validate_grad,
};
use finitediff::FiniteDiff;
use rayon::prelude::*;
use std::cell::RefCell;

/// How the finite-difference derivative is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DerivativeEvaluation {
    /// All components on the calling thread.
    #[default]
    Sequential,
    /// Components spread over the rayon worker pool.
    WorkerPool,
}

impl DerivativeEvaluation {
    /// Map the boolean concurrency flag onto an evaluation strategy.
    pub fn from_flag(use_multithreading: bool) -> Self {
        if use_multithreading {
            DerivativeEvaluation::WorkerPool
        } else {
            DerivativeEvaluation::Sequential
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, DerivativeEvaluation::WorkerPool)
    }

    /// value_and_derivative: cost value and derivative at `position`.
    ///
    /// Parameters
    /// ----------
    /// - `cost`: any [`CostFunction`], typically the scaled wrapper.
    /// - `position`: point of evaluation.
    ///
    /// Returns
    /// -------
    /// `OptResult<(Cost, Grad)>`
    ///   - the analytic pair when the cost function provides a derivative;
    ///   - otherwise `value(position)` together with a central-difference
    ///     derivative evaluated according to `self`.
    ///
    /// Errors
    /// ------
    /// - Any error from the cost function other than
    ///   `GradientNotImplemented`, unchanged.
    /// - Errors raised by the evaluations performed while differencing.
    /// - `OptError::InvalidGradient` / `GradientDimMismatch` when the
    ///   finite-difference result fails validation.
    pub fn value_and_derivative<F: CostFunction + ?Sized>(
        &self, cost: &F, position: &Theta,
    ) -> OptResult<(Cost, Grad)> {
        match cost.value_and_derivative(position) {
            Err(OptError::GradientNotImplemented) => {
                let value = cost.value(position)?;
                let derivative = self.finite_difference(cost, position)?;
                Ok((value, derivative))
            }
            other => other,
        }
    }

    /// Central-difference derivative of `cost` at `position`.
    ///
    /// # Errors
    /// See [`Self::value_and_derivative`].
    pub fn finite_difference<F: CostFunction + ?Sized>(
        &self, cost: &F, position: &Theta,
    ) -> OptResult<Grad> {
        match self {
            DerivativeEvaluation::Sequential => sequential_central_diff(cost, position),
            DerivativeEvaluation::WorkerPool => parallel_central_diff(cost, position),
        }
    }
}

// ---- Helper methods ----

fn fd_step() -> f64 {
    f64::EPSILON.sqrt()
}

fn sequential_central_diff<F: CostFunction + ?Sized>(cost: &F, position: &Theta) -> OptResult<Grad> {
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let cost_func = |theta: &Theta| -> f64 {
        match cost.value(theta) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let fd_grad = position.central_diff(&cost_func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, position.len())?;
    Ok(fd_grad)
}

fn parallel_central_diff<F: CostFunction + ?Sized>(cost: &F, position: &Theta) -> OptResult<Grad> {
    let h = fd_step();
    let components: Vec<f64> = (0..position.len())
        .into_par_iter()
        .map(|i| -> OptResult<f64> {
            let mut shifted = position.clone();
            let xi = shifted[i];
            shifted[i] = xi + h;
            let f_plus = cost.value(&shifted)?;
            shifted[i] = xi - h;
            let f_minus = cost.value(&shifted)?;
            Ok((f_plus - f_minus) / (2.0 * h))
        })
        .collect::<OptResult<Vec<f64>>>()?;
    let fd_grad = Grad::from(components);
    validate_grad(&fd_grad, position.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// f(p) = Σ (i + 1) · p_i², value only.
    struct Bowl {
        dim: usize,
    }

    impl CostFunction for Bowl {
        fn number_of_parameters(&self) -> usize {
            self.dim
        }

        fn value(&self, p: &Theta) -> OptResult<Cost> {
            Ok(p.iter().enumerate().map(|(i, x)| (i as f64 + 1.0) * x * x).sum())
        }
    }

    /// Analytic derivative that should never be replaced by differences.
    struct Analytic;

    impl CostFunction for Analytic {
        fn number_of_parameters(&self) -> usize {
            1
        }

        fn value(&self, p: &Theta) -> OptResult<Cost> {
            Ok(p[0])
        }

        fn derivative(&self, _p: &Theta) -> OptResult<Grad> {
            Ok(array![42.0])
        }
    }

    /// Infeasible for any positive first coordinate.
    struct HalfSpace;

    impl CostFunction for HalfSpace {
        fn number_of_parameters(&self) -> usize {
            2
        }

        fn value(&self, p: &Theta) -> OptResult<Cost> {
            if p[0] > 0.0 {
                return Err(OptError::MetricEvaluation { text: "outside".to_string() });
            }
            Ok(p.sum())
        }
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Preference for analytic derivatives over finite differences.
    // - Agreement of the sequential and worker-pool paths.
    // - Error capture on both paths.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Analytic derivatives are used verbatim.
    //
    // Given
    // -----
    // - A cost function whose derivative is the constant 42.
    //
    // Expect
    // ------
    // - Both strategies return 42, not the finite-difference value 1.
    fn analytic_derivative_is_preferred() {
        // Arrange
        let p = array![3.0];

        // Act
        let (v_seq, g_seq) =
            DerivativeEvaluation::Sequential.value_and_derivative(&Analytic, &p).expect("ok");
        let (_, g_par) =
            DerivativeEvaluation::WorkerPool.value_and_derivative(&Analytic, &p).expect("ok");

        // Assert
        assert_eq!(v_seq, 3.0);
        assert_eq!(g_seq, array![42.0]);
        assert_eq!(g_par, array![42.0]);
    }

    #[test]
    // Purpose
    // -------
    // The worker pool changes evaluation speed only: both paths agree.
    //
    // Given
    // -----
    // - A 6-dimensional weighted bowl evaluated at a fixed point.
    //
    // Expect
    // ------
    // - Sequential and worker-pool derivatives agree to 1e-6 and match the
    //   analytic gradient `2 (i + 1) p_i` to 1e-5.
    fn sequential_and_worker_pool_agree() {
        // Arrange
        let f = Bowl { dim: 6 };
        let p = array![0.3, -1.2, 2.0, 0.0, -0.7, 1.1];

        // Act
        let (_, g_seq) =
            DerivativeEvaluation::Sequential.value_and_derivative(&f, &p).expect("feasible");
        let (_, g_par) =
            DerivativeEvaluation::WorkerPool.value_and_derivative(&f, &p).expect("feasible");

        // Assert
        for i in 0..6 {
            assert_abs_diff_eq!(g_seq[i], g_par[i], epsilon = 1e-6);
            assert_abs_diff_eq!(g_seq[i], 2.0 * (i as f64 + 1.0) * p[i], epsilon = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // An evaluation failure during differencing is surfaced, not hidden in NaN.
    //
    // Given
    // -----
    // - A point on the feasibility boundary (first coordinate 0), so the
    //   `+h` evaluation is infeasible.
    //
    // Expect
    // ------
    // - Both strategies return the `MetricEvaluation` error.
    fn differencing_errors_are_propagated() {
        // Arrange
        let p = array![0.0, 1.0];
        let expected = OptError::MetricEvaluation { text: "outside".to_string() };

        // Act / Assert
        assert_eq!(
            DerivativeEvaluation::Sequential.finite_difference(&HalfSpace, &p),
            Err(expected.clone())
        );
        assert_eq!(DerivativeEvaluation::WorkerPool.finite_difference(&HalfSpace, &p), Err(expected));
    }

    /// Value-only bowl that counts its evaluations.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl CostFunction for Counting {
        fn number_of_parameters(&self) -> usize {
            3
        }

        fn value(&self, p: &Theta) -> OptResult<Cost> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(p.dot(p))
        }
    }

    #[test]
    // Purpose
    // -------
    // The fallback evaluates the value at the position only once.
    //
    // Given
    // -----
    // - A 3-parameter value-only cost function counting its evaluations.
    //
    // Expect
    // ------
    // - Each strategy performs exactly 1 + 2·3 evaluations.
    fn fallback_evaluates_value_once() {
        for evaluation in [DerivativeEvaluation::Sequential, DerivativeEvaluation::WorkerPool] {
            // Arrange
            let f = Counting::default();
            let p = array![1.0, -0.5, 2.0];

            // Act
            let (value, _) = evaluation.value_and_derivative(&f, &p).expect("feasible");

            // Assert
            assert_eq!(value, 5.25);
            assert_eq!(f.calls.load(Ordering::Relaxed), 7, "{evaluation:?}");
        }
    }

    #[test]
    fn from_flag_selects_strategy() {
        assert_eq!(DerivativeEvaluation::from_flag(false), DerivativeEvaluation::Sequential);
        assert!(DerivativeEvaluation::from_flag(true).is_parallel());
    }
}
