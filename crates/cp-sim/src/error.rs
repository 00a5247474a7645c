//! Error and diagnostic types for simulation runs.

use crate::state::ThermalState;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where the finite-value guard fired relative to the step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPhase {
    BeforeStep,
    AfterStep,
}

impl fmt::Display for GuardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardPhase::BeforeStep => f.write_str("before step"),
            GuardPhase::AfterStep => f.write_str("after step"),
        }
    }
}

/// Diagnostic for a run cut short by a non-finite temperature.
#[derive(Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[error("{cause} ({phase} {step}, t = {time_s} s; {state})")]
pub struct Divergence {
    /// Zero-based step index
    pub step: usize,
    /// Elapsed time when the guard fired (s)
    pub time_s: f64,
    pub phase: GuardPhase,
    /// Offending state
    pub state: ThermalState,
    pub cause: String,
}

/// Errors for callers that require a complete run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Simulation diverged: {0}")]
    Diverged(Box<Divergence>),
}

pub type SimResult<T> = Result<T, SimError>;
