//! The optimizer control core: one iteration state machine driving any
//! [`StepStrategy`] over a scaled cost function.
//!
//! Purpose
//! -------
//! Own the current position, the iteration counter, the stop condition and
//! the run state, and implement Start / Resume / Stop / AdvanceOneStep once
//! for every strategy.
//!
//! Key behaviors
//! -------------
//! - `start_optimization` validates the whole configuration, maps the initial
//!   position into scaled space, resets the counter and the strategy, and runs
//!   the loop.
//! - `resume_optimization` continues from the in-memory position and counter.
//! - The loop checks the iteration budget first, then the stop flag, then
//!   advances one step, so a stop requested on the last iteration still
//!   reports [`StopCondition::MaxIterationsReached`]. A failing step records
//!   [`StopCondition::MetricEvaluationError`] and returns the error.
//! - Observers are notified after every completed iteration.
//!
//! Invariants & assumptions
//! ------------------------
//! - The position is mutated only by a successful strategy step. A failed
//!   step leaves both the position and the counter untouched.
//! - `stop_condition` is `None` while running and after a stop request that
//!   interrupts the budget; it is set exactly once when the run terminates on
//!   its own.
//! - Configuration errors are reported before any state transition.
//!
//! Conventions
//! -----------
//! - The in-memory position is in scaled space; `current_position` returns it
//!   in native units.
//! - A stop requested through [`StopHandle`] is honored at the next iteration
//!   boundary, never in the middle of an evaluation.
use crate::optimization::{
    control::{
        options::{OptimOutcome, OptimizerOptions},
        traits::{IterationReport, Observer, StepContext, StepDiagnostics, StepStrategy, StopHandle},
        types::{RunState, StopCondition},
    },
    cost_function::{CostFunction, ScaledCostFunction},
    errors::{OptError, OptResult},
    numerical_stability::ScaleVector,
    types::{Cost, Theta},
    validation::validate_initial_position,
};
use tracing::{debug, info, warn};

/// Iterative optimizer parameterized by its step strategy `S` and the
/// caller's cost function `F`.
pub struct Optimizer<S, F> {
    strategy: S,
    cost: ScaledCostFunction<F>,
    options: OptimizerOptions,
    initial_position: Option<Theta>,
    position: Option<Theta>,
    current_iteration: usize,
    stop_condition: Option<StopCondition>,
    run_state: RunState,
    stop: StopHandle,
    observers: Vec<Box<dyn Observer>>,
}

impl<S, F> Optimizer<S, F>
where
    S: StepStrategy,
    F: CostFunction,
{
    /// Build an idle optimizer with default [`OptimizerOptions`] and no scales.
    pub fn new(strategy: S, cost: F) -> Self {
        Self::with_options(strategy, cost, OptimizerOptions::default())
    }

    pub fn with_options(strategy: S, cost: F, options: OptimizerOptions) -> Self {
        Self {
            strategy,
            cost: ScaledCostFunction::new(cost),
            options,
            initial_position: None,
            position: None,
            current_iteration: 0,
            stop_condition: None,
            run_state: RunState::Idle,
            stop: StopHandle::new(),
            observers: Vec::new(),
        }
    }

    // ---- Configuration ----

    /// Set the starting estimate, in native parameter units.
    ///
    /// Read by the next `start_optimization`; a stopped run keeps its
    /// in-memory position until then.
    pub fn set_initial_position(&mut self, position: Theta) {
        self.initial_position = Some(position);
    }

    pub fn set_number_of_iterations(&mut self, number_of_iterations: usize) {
        self.options.number_of_iterations = number_of_iterations;
    }

    pub fn set_maximize(&mut self, maximize: bool) {
        self.options.maximize = maximize;
    }

    pub fn set_minimize(&mut self, minimize: bool) {
        self.options.maximize = !minimize;
    }

    /// Replace (or clear) the per-dimension scales.
    ///
    /// If a stopped run holds a position, it is re-expressed under the new
    /// scales so its native value is preserved for a later resume.
    ///
    /// # Errors
    /// [`OptError::ScaleDimMismatch`] when the scales do not match the cost
    /// function's dimension; the previous scales stay in place.
    pub fn set_scales(&mut self, scales: Option<ScaleVector>) -> OptResult<()> {
        let native =
            self.position.as_ref().map(|p| self.cost.to_native_parameters(p)).transpose()?;
        self.cost.set_scales(scales)?;
        if let Some(native) = native {
            self.position = Some(self.cost.to_scaled_parameters(&native)?);
        }
        Ok(())
    }

    pub fn add_observer<O: Observer + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// A handle through which callbacks or other threads can request a stop.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    // ---- Lifecycle ----

    /// Start a fresh run from the initial position.
    ///
    /// # Errors
    /// - [`OptError::InvalidRunState`] if a run is already in progress.
    /// - Configuration errors (`EmptyParameterSpace`, `MissingInitialPosition`,
    ///   `PositionDimMismatch`, `InvalidInitialPosition`, `ScaleDimMismatch`,
    ///   strategy errors) before any state change.
    /// - The cost function's error when a step fails; the run is then stopped
    ///   with [`StopCondition::MetricEvaluationError`].
    pub fn start_optimization(&mut self) -> OptResult<OptimOutcome> {
        if self.run_state == RunState::Running {
            return Err(OptError::InvalidRunState { operation: "start", state: self.run_state });
        }
        self.initialize_run()?;
        self.stop.clear();
        self.run_state = RunState::Running;
        info!(
            strategy = self.strategy.name(),
            dimension = self.cost.number_of_parameters(),
            number_of_iterations = self.options.number_of_iterations,
            maximize = self.options.maximize,
            "starting optimization"
        );
        self.run_loop()
    }

    /// Continue a stopped run from its current position and counter.
    ///
    /// # Errors
    /// - [`OptError::InvalidRunState`] unless the optimizer is stopped with a
    ///   position from a previous run.
    /// - Strategy configuration errors.
    /// - The cost function's error when a step fails.
    pub fn resume_optimization(&mut self) -> OptResult<OptimOutcome> {
        if self.run_state != RunState::Stopped || self.position.is_none() {
            return Err(OptError::InvalidRunState { operation: "resume", state: self.run_state });
        }
        self.strategy.validate(self.cost.number_of_parameters())?;
        self.stop.clear();
        self.stop_condition = None;
        self.run_state = RunState::Running;
        info!(
            strategy = self.strategy.name(),
            iteration = self.current_iteration,
            number_of_iterations = self.options.number_of_iterations,
            "resuming optimization"
        );
        self.run_loop()
    }

    /// Stop the optimizer.
    ///
    /// Outside a run this only marks a previously started optimizer as
    /// stopped; an idle optimizer stays idle. To stop a run in progress use
    /// [`Self::stop_handle`]. Idempotent.
    pub fn stop_optimization(&mut self) {
        self.stop.request_stop();
        if self.run_state != RunState::Idle {
            self.run_state = RunState::Stopped;
        }
    }

    /// Perform exactly one iteration outside the loop.
    ///
    /// On an optimizer that has not run yet the configuration is validated
    /// and the initial position loaded first. The iteration budget is not
    /// consulted. Afterwards the optimizer is stopped and can be resumed.
    ///
    /// # Errors
    /// Configuration errors as for [`Self::start_optimization`], or the cost
    /// function's error when the step fails.
    pub fn advance_one_step(&mut self) -> OptResult<()> {
        if self.position.is_none() {
            self.initialize_run()?;
        }
        let result = self.step();
        if self.run_state != RunState::Running {
            self.run_state = RunState::Stopped;
        }
        result
    }

    // ---- Accessors ----

    pub fn current_iteration(&self) -> usize {
        self.current_iteration
    }

    pub fn stop_condition(&self) -> Option<StopCondition> {
        self.stop_condition
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn options(&self) -> &OptimizerOptions {
        &self.options
    }

    /// Current position in native parameter units.
    pub fn current_position(&self) -> Option<Theta> {
        self.position.as_ref().and_then(|p| self.cost.to_native_parameters(p).ok())
    }

    /// Current position as the strategy sees it.
    pub fn scaled_current_position(&self) -> Option<&Theta> {
        self.position.as_ref()
    }

    /// Last cost value recorded by the strategy, if any.
    pub fn current_value(&self) -> Option<Cost> {
        self.strategy.diagnostics().value
    }

    pub fn diagnostics(&self) -> StepDiagnostics {
        self.strategy.diagnostics()
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Mutable access for reconfiguring the strategy between runs.
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    pub fn cost_function(&self) -> &ScaledCostFunction<F> {
        &self.cost
    }

    // ---- Helper methods ----

    fn initialize_run(&mut self) -> OptResult<()> {
        let dim = self.cost.number_of_parameters();
        if dim == 0 {
            return Err(OptError::EmptyParameterSpace);
        }
        let initial = self.initial_position.as_ref().ok_or(OptError::MissingInitialPosition)?;
        validate_initial_position(initial, dim)?;
        if let Some(scales) = self.cost.scales() {
            scales.check_dimension(dim)?;
        }
        self.strategy.validate(dim)?;

        self.position = Some(self.cost.to_scaled_parameters(initial)?);
        self.strategy.reset(dim);
        self.current_iteration = 0;
        self.stop_condition = None;
        Ok(())
    }

    fn run_loop(&mut self) -> OptResult<OptimOutcome> {
        loop {
            if self.current_iteration >= self.options.number_of_iterations {
                self.stop_condition = Some(StopCondition::MaxIterationsReached);
                self.run_state = RunState::Stopped;
                info!(
                    iteration = self.current_iteration,
                    value = ?self.current_value(),
                    "optimization finished: {}",
                    StopCondition::MaxIterationsReached
                );
                break;
            }
            if self.stop.is_stop_requested() {
                self.run_state = RunState::Stopped;
                info!(iteration = self.current_iteration, "optimization stopped on request");
                break;
            }
            self.step()?;
        }
        self.outcome()
    }

    fn step(&mut self) -> OptResult<()> {
        let position = self.position.as_mut().ok_or(OptError::MissingInitialPosition)?;
        let ctx = StepContext { iteration: self.current_iteration, maximize: self.options.maximize };
        if let Err(err) = self.strategy.advance(&self.cost, position, ctx) {
            self.stop_condition = Some(StopCondition::MetricEvaluationError);
            self.run_state = RunState::Stopped;
            warn!(
                strategy = self.strategy.name(),
                iteration = self.current_iteration,
                error = %err,
                "optimization stopped: {}",
                StopCondition::MetricEvaluationError
            );
            return Err(err);
        }
        self.current_iteration += 1;

        let diagnostics = self.strategy.diagnostics();
        debug!(
            iteration = self.current_iteration,
            value = ?diagnostics.value,
            learning_rate = diagnostics.learning_rate,
            step_length = ?diagnostics.step_length,
            gradient_magnitude = ?diagnostics.gradient_magnitude,
            "iteration completed"
        );
        let report = IterationReport {
            iteration: self.current_iteration,
            position: &*position,
            diagnostics,
            strategy: self.strategy.name(),
        };
        for observer in self.observers.iter_mut() {
            observer.observe_iteration(&report);
        }
        Ok(())
    }

    fn outcome(&self) -> OptResult<OptimOutcome> {
        let scaled = self.position.as_ref().ok_or(OptError::MissingInitialPosition)?;
        let position = self.cost.to_native_parameters(scaled)?;
        Ok(OptimOutcome {
            position,
            value: self.current_value(),
            iterations: self.current_iteration,
            stop_condition: self.stop_condition,
            run_state: self.run_state,
        })
    }
}
