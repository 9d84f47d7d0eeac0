//! control: shared start/resume/stop skeleton for every optimization strategy.
//!
//! Purpose
//! -------
//! Provide one reusable iteration state machine, [`Optimizer`], parameterized
//! by a [`StepStrategy`] capability rather than by inheritance.
//!
//! Key behaviors
//! -------------
//! - [`Optimizer`] owns position, counter, stop condition and run state.
//! - [`StepStrategy`] is the per-iteration capability a strategy implements.
//! - [`Observer`] and [`StopHandle`] let callers watch and cancel a run.
//!
//! Conventions
//! -----------
//! - Lifecycle violations are reported as
//!   [`OptError::InvalidRunState`](crate::optimization::errors::OptError).
//! - The loop is single-threaded; cancellation is checked at iteration
//!   boundaries only.

pub mod options;
pub mod run;
pub mod traits;
pub mod types;

pub use self::options::{OptimOutcome, OptimizerOptions};
pub use self::run::Optimizer;
pub use self::traits::{
    IterationReport, Observer, StepContext, StepDiagnostics, StepStrategy, StopHandle,
};
pub use self::types::{RunState, StopCondition};

pub mod prelude {
    pub use super::options::{OptimOutcome, OptimizerOptions};
    pub use super::run::Optimizer;
    pub use super::traits::{IterationReport, Observer, StepDiagnostics, StepStrategy, StopHandle};
    pub use super::types::{RunState, StopCondition};
}
