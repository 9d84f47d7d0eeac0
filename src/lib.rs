//! rust_regopt: iterative optimizers for image registration.
//!
//! Purpose
//! -------
//! Provide a resumable, cancellable optimization engine that drives a
//! caller-supplied cost function toward a minimum (or maximum). Two
//! strategies share one control core: fixed-learning-rate gradient descent
//! and simultaneous perturbation stochastic approximation (SPSA).
//!
//! Key behaviors
//! -------------
//! - Wrap any [`CostFunction`](optimization::cost_function::CostFunction) in a
//!   per-dimension scaling so gains act on a homogeneous search space.
//! - Run, stop, resume or single-step an
//!   [`Optimizer`](optimization::control::Optimizer).
//! - Report every failure through
//!   [`OptError`](optimization::errors::OptError).
//!
//! Conventions
//! -----------
//! - Most callers only need `use rust_regopt::optimization::prelude::*;`.
//! - Logging goes through `tracing`; install a subscriber to see it.

pub mod optimization;
