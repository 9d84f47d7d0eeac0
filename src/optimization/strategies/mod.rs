//! strategies: the numerical update rules driven by the control core.
//!
//! Key behaviors
//! -------------
//! - [`GradientDescent`]: deterministic fixed-learning-rate descent on the
//!   (scaled) derivative, with a sequential or worker-pool finite-difference
//!   fallback.
//! - [`Spsa`]: simultaneous-perturbation gradient estimates from two value
//!   evaluations per iteration, with decaying gain sequences.
//!
//! Both implement [`StepStrategy`](crate::optimization::control::StepStrategy)
//! and leave the position untouched when any evaluation of a step fails.

pub mod gradient_descent;
pub mod spsa;

pub use self::gradient_descent::{GradientDescent, GradientDescentOptions};
pub use self::spsa::{Spsa, SpsaOptions};

pub mod prelude {
    pub use super::gradient_descent::{GradientDescent, GradientDescentOptions};
    pub use super::spsa::{Spsa, SpsaOptions};
}
