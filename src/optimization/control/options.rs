//! Run-level options and the outcome returned by Start/Resume.
use crate::optimization::{
    control::types::{RunState, StopCondition},
    types::{Cost, Theta, DEFAULT_NUMBER_OF_ITERATIONS},
};

/// Strategy-independent run options.
///
/// Default:
/// - `number_of_iterations`: `100`
/// - `maximize`: `false`
///
/// Zero iterations is admissible: a started run terminates immediately with
/// [`StopCondition::MaxIterationsReached`] and never evaluates the cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerOptions {
    pub number_of_iterations: usize,
    pub maximize: bool,
}

impl OptimizerOptions {
    pub fn new(number_of_iterations: usize, maximize: bool) -> Self {
        Self { number_of_iterations, maximize }
    }
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self { number_of_iterations: DEFAULT_NUMBER_OF_ITERATIONS, maximize: false }
    }
}

/// Summary of a run after Start or Resume returns.
///
/// - `position`: current position mapped back to native parameter units.
/// - `value`: last cost value the strategy recorded, if any.
/// - `iterations`: the iteration counter; not reset by a resume.
/// - `stop_condition`: `None` when the run was paused by a stop request.
/// - `run_state`: always `Stopped` for a returned run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub position: Theta,
    pub value: Option<Cost>,
    pub iterations: usize,
    pub stop_condition: Option<StopCondition>,
    pub run_state: RunState,
}

impl OptimOutcome {
    /// `true` when the run ended by exhausting its iteration budget.
    pub fn completed(&self) -> bool {
        self.stop_condition == Some(StopCondition::MaxIterationsReached)
    }

    /// `true` when the run was paused by a stop request and can be resumed.
    pub fn interrupted(&self) -> bool {
        self.stop_condition.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn default_options() {
        let opts = OptimizerOptions::default();
        assert_eq!(opts.number_of_iterations, 100);
        assert!(!opts.maximize);
    }

    #[test]
    fn outcome_classification() {
        let mut outcome = OptimOutcome {
            position: array![1.0],
            value: None,
            iterations: 3,
            stop_condition: None,
            run_state: RunState::Stopped,
        };
        assert!(outcome.interrupted());
        assert!(!outcome.completed());

        outcome.stop_condition = Some(StopCondition::MaxIterationsReached);
        assert!(outcome.completed());
        assert!(!outcome.interrupted());
    }
}
