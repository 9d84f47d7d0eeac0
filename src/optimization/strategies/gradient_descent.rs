//! strategies::gradient_descent: fixed-learning-rate gradient descent.
//!
//! Purpose
//! -------
//! Deterministic first-order update `θ ← θ + η·d` where `d = −∇f(θ)` when
//! minimizing and `d = +∇f(θ)` when maximizing.
//!
//! Key behaviors
//! -------------
//! - Value and derivative are obtained through a [`DerivativeEvaluation`],
//!   which uses the cost function's analytic derivative when available and
//!   central differences otherwise.
//! - The evaluation flag selects sequential or worker-pool differencing; it
//!   affects speed only, and only for cost functions without an analytic
//!   derivative.
//! - The value, gradient and search direction of the last successful step are
//!   kept for inspection.
//!
//! Invariants & assumptions
//! ------------------------
//! - The learning rate is finite and non-negative; zero yields a run that
//!   never moves.
//! - The position is written only after value and derivative passed
//!   validation.
use crate::optimization::{
    control::{StepContext, StepDiagnostics, StepStrategy},
    cost_function::{CostFunction, DerivativeEvaluation},
    errors::OptResult,
    types::{Cost, DEFAULT_LEARNING_RATE, Grad, Theta},
    validation::{validate_grad, validate_value, verify_learning_rate},
};
use argmin_math::ArgminL2Norm;

/// Configuration for [`GradientDescent`].
///
/// Default:
/// - `learning_rate`: `1.0`
/// - `evaluation`: [`DerivativeEvaluation::Sequential`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescentOptions {
    pub learning_rate: f64,
    /// Sequential or worker-pool differencing. Only used for cost functions
    /// without an analytic derivative.
    pub evaluation: DerivativeEvaluation,
}

impl GradientDescentOptions {
    /// # Errors
    /// [`crate::optimization::errors::OptError::InvalidLearningRate`] for a
    /// negative or non-finite learning rate.
    pub fn new(learning_rate: f64, use_multithreading: bool) -> OptResult<Self> {
        verify_learning_rate(learning_rate)?;
        Ok(Self { learning_rate, evaluation: DerivativeEvaluation::from_flag(use_multithreading) })
    }
}

impl Default for GradientDescentOptions {
    fn default() -> Self {
        Self { learning_rate: DEFAULT_LEARNING_RATE, evaluation: DerivativeEvaluation::Sequential }
    }
}

/// Gradient descent step strategy.
#[derive(Debug, Clone, Default)]
pub struct GradientDescent {
    options: GradientDescentOptions,
    value: Option<Cost>,
    gradient: Option<Grad>,
    search_direction: Option<Grad>,
    step_length: Option<f64>,
}

impl GradientDescent {
    pub fn new(options: GradientDescentOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn options(&self) -> &GradientDescentOptions {
        &self.options
    }

    /// # Errors
    /// `InvalidLearningRate` for a negative or non-finite value; the previous
    /// learning rate is kept.
    pub fn set_learning_rate(&mut self, learning_rate: f64) -> OptResult<()> {
        verify_learning_rate(learning_rate)?;
        self.options.learning_rate = learning_rate;
        Ok(())
    }

    pub fn learning_rate(&self) -> f64 {
        self.options.learning_rate
    }

    /// Spread the finite-difference fallback over the rayon worker pool.
    ///
    /// Has no effect when the cost function supplies an analytic derivative;
    /// that derivative is evaluated once, as provided.
    pub fn set_use_multithreading(&mut self, use_multithreading: bool) {
        self.options.evaluation = DerivativeEvaluation::from_flag(use_multithreading);
    }

    pub fn use_multithreading(&self) -> bool {
        self.options.evaluation.is_parallel()
    }

    /// Cost at the position the last step started from.
    pub fn value(&self) -> Option<Cost> {
        self.value
    }

    pub fn gradient(&self) -> Option<&Grad> {
        self.gradient.as_ref()
    }

    pub fn search_direction(&self) -> Option<&Grad> {
        self.search_direction.as_ref()
    }
}

impl StepStrategy for GradientDescent {
    fn name(&self) -> &'static str {
        "gradient-descent"
    }

    fn validate(&self, _dim: usize) -> OptResult<()> {
        verify_learning_rate(self.options.learning_rate)
    }

    fn reset(&mut self, _dim: usize) {
        self.value = None;
        self.gradient = None;
        self.search_direction = None;
        self.step_length = None;
    }

    fn advance<F: CostFunction + ?Sized>(
        &mut self, cost: &F, position: &mut Theta, ctx: StepContext,
    ) -> OptResult<()> {
        let (value, gradient) = self.options.evaluation.value_and_derivative(cost, position)?;
        validate_value(value)?;
        validate_grad(&gradient, position.len())?;

        let search_direction = if ctx.maximize { gradient.clone() } else { -&gradient };
        position.scaled_add(self.options.learning_rate, &search_direction);

        self.step_length = Some(self.options.learning_rate * search_direction.l2_norm());
        self.value = Some(value);
        self.gradient = Some(gradient);
        self.search_direction = Some(search_direction);
        Ok(())
    }

    fn diagnostics(&self) -> StepDiagnostics {
        StepDiagnostics {
            value: self.value,
            learning_rate: self.options.learning_rate,
            gradient_magnitude: self.gradient.as_ref().map(|g| g.l2_norm()),
            step_length: self.step_length,
        }
    }
}
