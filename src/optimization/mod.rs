//! optimization: iterative optimizers for image registration.
//!
//! Purpose
//! -------
//! Find the parameter vector that minimizes (or maximizes) an externally
//! supplied similarity measure. The measure is reached only through the
//! [`cost_function::CostFunction`] contract; image I/O and transform
//! parameterization stay outside this crate.
//!
//! Key behaviors
//! -------------
//! - `cost_function`: the contract, the scaling wrapper, the argmin bridge and
//!   finite-difference derivatives.
//! - `numerical_stability`: per-dimension scale factors.
//! - `control`: the shared start/resume/stop state machine.
//! - `strategies`: gradient descent and SPSA.
//! - `errors`: one error enum (`OptError`) and result alias (`OptResult<T>`)
//!   for configuration, lifecycle, cost-function and backend failures.
//!
//! Invariants & assumptions
//! ------------------------
//! - Termination is driven by the iteration budget, a stop request or a
//!   metric evaluation error only.
//! - A failing or non-finite evaluation never produces a position update.
//! - Library code never panics on invalid input; it returns `OptError`.
//!
//! Conventions
//! -----------
//! - Positions and derivatives use the `ndarray` aliases in [`types`].
//! - Progress is reported through `tracing` events and
//!   [`control::Observer`]s; no subscriber is installed here.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module.
//! - `tests/` drives complete runs of both strategies, including resume,
//!   metric errors and scaled search spaces.

pub mod control;
pub mod cost_function;
pub mod errors;
pub mod numerical_stability;
pub mod strategies;
pub mod types;
pub mod validation;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_regopt::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::control::prelude::*;
    pub use super::cost_function::prelude::*;
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
    pub use super::strategies::prelude::*;
    pub use super::types::{Cost, Grad, Theta};
}
