//! strategies::spsa: Simultaneous Perturbation Stochastic Approximation.
//!
//! Purpose
//! -------
//! Estimate the gradient from two value-only evaluations per iteration and
//! apply a decaying step-size schedule. Used when analytic derivatives are
//! unavailable or too costly.
//!
//! Key behaviors
//! -------------
//! - Gain sequences at iteration `k` (completed iterations, first step k = 0):
//!   `a_k = a / (k + 1 + A)^alpha` and `c_k = c / (k + 1)^gamma`.
//! - Perturbation `Δ_k` has independent ±1 components with equal probability.
//! - Gradient estimate `ĝ_i = (f(θ + c_k Δ) − f(θ − c_k Δ)) / (2 c_k Δ_i)`.
//! - Update `θ ← θ − a_k ĝ` when minimizing, `θ + a_k ĝ` when maximizing.
//! - Optionally evaluates `f` at the new position for progress reporting.
//!
//! Invariants & assumptions
//! ------------------------
//! - `a`, `c`, `alpha`, `gamma` are finite and positive; `A` is finite and
//!   non-negative.
//! - Every evaluation of a step (including the optional current value)
//!   succeeds before the position is written.
//! - With a seed, a fresh start replays the same perturbation sequence;
//!   a resume continues the sequence.
use crate::optimization::{
    control::{StepContext, StepDiagnostics, StepStrategy},
    cost_function::CostFunction,
    errors::OptResult,
    types::{
        Cost, DEFAULT_SPSA_A, DEFAULT_SPSA_ALPHA, DEFAULT_SPSA_BIG_A, DEFAULT_SPSA_C,
        DEFAULT_SPSA_GAMMA, Grad, Theta,
    },
    validation::{validate_value, verify_gain},
};
use argmin_math::ArgminL2Norm;
use ndarray::Array1;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Tuning constants for [`Spsa`].
///
/// Default:
/// - `a = 1`, `c = 1`, `big_a = 50`, `alpha = 0.602`, `gamma = 0.101`
/// - `compute_current_value = false`
/// - `seed = None` (entropy-seeded generator)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpsaOptions {
    pub a: f64,
    pub c: f64,
    pub big_a: f64,
    pub alpha: f64,
    pub gamma: f64,
    pub compute_current_value: bool,
    pub seed: Option<u64>,
}

impl SpsaOptions {
    /// Build validated SPSA options.
    ///
    /// # Errors
    /// [`crate::optimization::errors::OptError::InvalidGain`] naming the first
    /// offending constant.
    pub fn new(
        a: f64, c: f64, big_a: f64, alpha: f64, gamma: f64, compute_current_value: bool,
        seed: Option<u64>,
    ) -> OptResult<Self> {
        let options = Self { a, c, big_a, alpha, gamma, compute_current_value, seed };
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> OptResult<()> {
        verify_gain("a", self.a, false)?;
        verify_gain("c", self.c, false)?;
        verify_gain("A", self.big_a, true)?;
        verify_gain("alpha", self.alpha, false)?;
        verify_gain("gamma", self.gamma, false)
    }
}

impl Default for SpsaOptions {
    fn default() -> Self {
        Self {
            a: DEFAULT_SPSA_A,
            c: DEFAULT_SPSA_C,
            big_a: DEFAULT_SPSA_BIG_A,
            alpha: DEFAULT_SPSA_ALPHA,
            gamma: DEFAULT_SPSA_GAMMA,
            compute_current_value: false,
            seed: None,
        }
    }
}

/// SPSA step strategy.
#[derive(Debug, Clone)]
pub struct Spsa {
    options: SpsaOptions,
    rng: StdRng,
    delta: Option<Theta>,
    gradient: Option<Grad>,
    value: Option<Cost>,
    current_step_length: Option<f64>,
    gradient_magnitude: Option<f64>,
    learning_rate: f64,
}

impl Spsa {
    pub fn new(options: SpsaOptions) -> Self {
        Self {
            rng: make_rng(options.seed),
            options,
            delta: None,
            gradient: None,
            value: None,
            current_step_length: None,
            gradient_magnitude: None,
            learning_rate: 0.0,
        }
    }

    pub fn options(&self) -> &SpsaOptions {
        &self.options
    }

    /// Step gain `a_k = a / (k + 1 + A)^alpha`.
    pub fn compute_a(&self, k: usize) -> f64 {
        let o = &self.options;
        o.a / (o.big_a + k as f64 + 1.0).powf(o.alpha)
    }

    /// Perturbation gain `c_k = c / (k + 1)^gamma`.
    pub fn compute_c(&self, k: usize) -> f64 {
        let o = &self.options;
        o.c / (k as f64 + 1.0).powf(o.gamma)
    }

    /// One simultaneous-perturbation gradient estimate at `position`.
    ///
    /// Draws a fresh perturbation from the strategy's generator and evaluates
    /// the cost twice. Does not touch the strategy's recorded state.
    ///
    /// # Errors
    /// - `InvalidGain` unless `ck` is finite and positive.
    /// - Any cost-function error, or `NonFiniteCost` for a non-finite value.
    pub fn estimate_gradient<F: CostFunction + ?Sized>(
        &mut self, cost: &F, position: &Theta, ck: f64,
    ) -> OptResult<Grad> {
        verify_gain("c_k", ck, false)?;
        self.perturbation_gradient(cost, position, ck).map(|(_, gradient)| gradient)
    }

    // ---- Setters (each validates its argument) ----

    pub fn set_a(&mut self, a: f64) -> OptResult<()> {
        verify_gain("a", a, false)?;
        self.options.a = a;
        Ok(())
    }

    pub fn set_c(&mut self, c: f64) -> OptResult<()> {
        verify_gain("c", c, false)?;
        self.options.c = c;
        Ok(())
    }

    pub fn set_big_a(&mut self, big_a: f64) -> OptResult<()> {
        verify_gain("A", big_a, true)?;
        self.options.big_a = big_a;
        Ok(())
    }

    pub fn set_alpha(&mut self, alpha: f64) -> OptResult<()> {
        verify_gain("alpha", alpha, false)?;
        self.options.alpha = alpha;
        Ok(())
    }

    pub fn set_gamma(&mut self, gamma: f64) -> OptResult<()> {
        verify_gain("gamma", gamma, false)?;
        self.options.gamma = gamma;
        Ok(())
    }

    pub fn set_compute_current_value(&mut self, compute_current_value: bool) {
        self.options.compute_current_value = compute_current_value;
    }

    /// Fix (or clear) the seed. Takes effect immediately and on every fresh start.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.options.seed = seed;
        self.rng = make_rng(seed);
    }

    // ---- Accessors ----

    /// Cost at the new position, when `compute_current_value` is enabled.
    pub fn value(&self) -> Option<Cost> {
        self.value
    }

    pub fn gradient(&self) -> Option<&Grad> {
        self.gradient.as_ref()
    }

    /// Perturbation used by the last step.
    pub fn perturbation(&self) -> Option<&Theta> {
        self.delta.as_ref()
    }

    /// `a_k · |ĝ|` of the last step.
    pub fn current_step_length(&self) -> Option<f64> {
        self.current_step_length
    }

    pub fn gradient_magnitude(&self) -> Option<f64> {
        self.gradient_magnitude
    }

    /// Realized `a_k` of the last step.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    // ---- Helper methods ----

    fn generate_delta(&mut self, dim: usize) -> Theta {
        let rng = &mut self.rng;
        Array1::from_shape_fn(dim, |_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
    }

    fn perturbation_gradient<F: CostFunction + ?Sized>(
        &mut self, cost: &F, position: &Theta, ck: f64,
    ) -> OptResult<(Theta, Grad)> {
        let delta = self.generate_delta(position.len());

        let mut shifted = position.clone();
        shifted.scaled_add(ck, &delta);
        let f_plus = cost.value(&shifted)?;
        validate_value(f_plus)?;

        shifted.scaled_add(-2.0 * ck, &delta);
        let f_minus = cost.value(&shifted)?;
        validate_value(f_minus)?;

        let diff = f_plus - f_minus;
        let gradient = delta.mapv(|d| diff / (2.0 * ck * d));
        Ok((delta, gradient))
    }
}

impl Default for Spsa {
    fn default() -> Self {
        Self::new(SpsaOptions::default())
    }
}

impl StepStrategy for Spsa {
    fn name(&self) -> &'static str {
        "spsa"
    }

    fn validate(&self, _dim: usize) -> OptResult<()> {
        self.options.validate()
    }

    fn reset(&mut self, _dim: usize) {
        if self.options.seed.is_some() {
            self.rng = make_rng(self.options.seed);
        }
        self.delta = None;
        self.gradient = None;
        self.value = None;
        self.current_step_length = None;
        self.gradient_magnitude = None;
        self.learning_rate = 0.0;
    }

    fn advance<F: CostFunction + ?Sized>(
        &mut self, cost: &F, position: &mut Theta, ctx: StepContext,
    ) -> OptResult<()> {
        let ak = self.compute_a(ctx.iteration);
        let ck = self.compute_c(ctx.iteration);
        let (delta, gradient) = self.perturbation_gradient(cost, position, ck)?;

        let direction = if ctx.maximize { 1.0 } else { -1.0 };
        let mut next = position.clone();
        next.scaled_add(direction * ak, &gradient);

        let value = if self.options.compute_current_value {
            let v = cost.value(&next)?;
            validate_value(v)?;
            Some(v)
        } else {
            None
        };

        let magnitude = gradient.l2_norm();
        *position = next;
        self.delta = Some(delta);
        self.gradient = Some(gradient);
        self.value = value;
        self.gradient_magnitude = Some(magnitude);
        self.current_step_length = Some(ak * magnitude);
        self.learning_rate = ak;
        Ok(())
    }

    fn diagnostics(&self) -> StepDiagnostics {
        StepDiagnostics {
            value: self.value,
            learning_rate: self.learning_rate,
            gradient_magnitude: self.gradient_magnitude,
            step_length: self.current_step_length,
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
