//! Capability traits and small value types used by the control core.
//!
//! - [`StepStrategy`]: what a strategy must provide to be driven by
//!   [`Optimizer`](crate::optimization::control::Optimizer).
//! - [`Observer`] / [`IterationReport`]: per-iteration progress callbacks.
//! - [`StopHandle`]: cooperative cancellation usable from callbacks and other
//!   threads.
use crate::optimization::{
    cost_function::CostFunction,
    errors::OptResult,
    types::Theta,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Per-step inputs supplied by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext {
    /// Number of iterations completed so far in this run (0 for the first step).
    pub iteration: usize,
    /// Ascend instead of descend.
    pub maximize: bool,
}

/// Diagnostics common to every strategy, refreshed after each successful step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepDiagnostics {
    /// Cost value associated with the last step, when one was computed.
    pub value: Option<f64>,
    /// Step-size multiplier realized in the last step.
    pub learning_rate: f64,
    /// L2 norm of the (estimated) derivative used in the last step.
    pub gradient_magnitude: Option<f64>,
    /// L2 norm of the last position update.
    pub step_length: Option<f64>,
}

/// One iteration's worth of evaluation and update.
///
/// The control core owns the position and the iteration counter; a strategy
/// only advances the position it is handed. On `Err` the strategy must leave
/// `position` untouched; the core then records a metric evaluation error.
pub trait StepStrategy {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Check the strategy's configuration for a search space of `dim` parameters.
    fn validate(&self, dim: usize) -> OptResult<()>;

    /// Clear per-run state before a fresh start.
    fn reset(&mut self, dim: usize);

    /// Advance `position` by one step.
    fn advance<F: CostFunction + ?Sized>(
        &mut self, cost: &F, position: &mut Theta, ctx: StepContext,
    ) -> OptResult<()>;

    fn diagnostics(&self) -> StepDiagnostics;
}

/// Snapshot handed to observers after each completed iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationReport<'a> {
    /// Iterations completed, including this one.
    pub iteration: usize,
    /// Position after the update, in scaled space.
    pub position: &'a Theta,
    pub diagnostics: StepDiagnostics,
    pub strategy: &'static str,
}

/// Progress callback invoked after every completed iteration.
pub trait Observer {
    fn observe_iteration(&mut self, report: &IterationReport<'_>);
}

impl<T> Observer for T
where
    T: FnMut(&IterationReport<'_>),
{
    fn observe_iteration(&mut self, report: &IterationReport<'_>) {
        self(report)
    }
}

/// Cloneable stop flag checked at iteration boundaries.
///
/// Requesting a stop never interrupts an evaluation in flight; the run halts
/// before the next iteration begins.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
