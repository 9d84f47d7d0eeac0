//! cost_function: the narrow contract between optimizers and objectives.
//!
//! Purpose
//! -------
//! Define what the optimizers need from an externally supplied similarity
//! measure, and the composable wrappers placed around it before the control
//! core sees it.
//!
//! Key behaviors
//! -------------
//! - [`CostFunction`]: value, derivative, combined value/derivative, and
//!   dimensionality. Only `value` and `number_of_parameters` are required.
//! - [`ScaledCostFunction`]: composes a
//!   [`ScaleVector`](crate::optimization::numerical_stability::ScaleVector)
//!   around any cost function so optimizers work in scaled space.
//! - [`ArgminProblem`]: lets argmin problems over `Array1<f64>` act as cost
//!   functions.
//! - [`DerivativeEvaluation`]: sequential or worker-pool central differences
//!   when no analytic derivative is available.
//!
//! Conventions
//! -----------
//! - Wrappers never swallow errors: whatever the wrapped function returns is
//!   what the control core sees.
//! - Infeasible positions are reported with
//!   [`OptError::MetricEvaluation`](crate::optimization::errors::OptError).

pub mod adapter;
pub mod finite_diff;
pub mod scaled;
pub mod traits;

pub use self::adapter::ArgminProblem;
pub use self::finite_diff::DerivativeEvaluation;
pub use self::scaled::ScaledCostFunction;
pub use self::traits::CostFunction;

pub mod prelude {
    pub use super::adapter::ArgminProblem;
    pub use super::finite_diff::DerivativeEvaluation;
    pub use super::scaled::ScaledCostFunction;
    pub use super::traits::CostFunction;
}
