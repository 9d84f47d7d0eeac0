//! Run-state and stop-condition enums shared by every strategy.
use std::fmt;

/// Why a run terminated.
///
/// Set exactly once per run, when it terminates. A stop requested through
/// [`StopHandle`](crate::optimization::control::StopHandle) pauses the run and
/// leaves the condition unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopCondition {
    /// The iteration counter reached the configured number of iterations.
    MaxIterationsReached,
    /// The cost function failed (or returned unusable output) during a step.
    MetricEvaluationError,
    /// Reserved; no strategy in this crate raises it.
    MinimumStepSizeReached,
}

impl fmt::Display for StopCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopCondition::MaxIterationsReached => write!(f, "maximum number of iterations reached"),
            StopCondition::MetricEvaluationError => write!(f, "metric evaluation error"),
            StopCondition::MinimumStepSizeReached => write!(f, "minimum step size reached"),
        }
    }
}

/// Lifecycle of an optimizer instance.
///
/// `Idle → Running` on start, `Running → Stopped` on a stop request or a
/// terminal condition, `Stopped → Running` on resume or restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Running => write!(f, "running"),
            RunState::Stopped => write!(f, "stopped"),
        }
    }
}
