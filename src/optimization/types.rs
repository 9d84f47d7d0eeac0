//! optimization::types: shared numeric aliases and defaults.
//!
//! Purpose
//! -------
//! Centralize the numeric types used by the cost-function contract, the
//! scaling transform, the control core and both step strategies, so the rest
//! of the crate stays agnostic to `ndarray` generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` always have length equal to the number of parameters
//!   reported by the cost function.
//! - Whether a `Theta` lives in scaled or native space is a property of the
//!   call site, not of the type; the control core keeps its in-memory position
//!   in scaled space.
use ndarray::Array1;

/// Parameter vector `θ` (a point in the registration search space).
pub type Theta = Array1<f64>;

/// Derivative (gradient or gradient estimate) of the cost at some `θ`.
pub type Grad = Array1<f64>;

/// Scalar cost-function value.
pub type Cost = f64;

/// Default number of iterations for a run.
pub const DEFAULT_NUMBER_OF_ITERATIONS: usize = 100;

/// Default learning rate for gradient descent.
pub const DEFAULT_LEARNING_RATE: f64 = 1.0;

/// Default SPSA step gain `a`.
pub const DEFAULT_SPSA_A: f64 = 1.0;

/// Default SPSA perturbation gain `c`.
pub const DEFAULT_SPSA_C: f64 = 1.0;

/// Default SPSA stability constant `A`.
pub const DEFAULT_SPSA_BIG_A: f64 = 50.0;

/// Default SPSA step-gain decay exponent `alpha`.
pub const DEFAULT_SPSA_ALPHA: f64 = 0.602;

/// Default SPSA perturbation decay exponent `gamma`.
pub const DEFAULT_SPSA_GAMMA: f64 = 0.101;

/// Default scale for the rotation parameters of a rigid (Euler) transform.
pub const DEFAULT_ROTATION_SCALE: f64 = 100_000.0;
