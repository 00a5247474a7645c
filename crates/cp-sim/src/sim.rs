//! Simulation runner and result recording.

use crate::error::{Divergence, GuardPhase, SimError, SimResult};
use crate::integrator::Integrator;
use crate::state::{Sample, ThermalState};
use cp_params::SimulationParameters;
use serde::{Deserialize, Serialize};

/// Options for simulation runs.
#[derive(Clone, Copy, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Number of steps after the initial sample
    pub steps: usize,
}

impl SimOptions {
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self {
            dt: params.dt_s,
            steps: params.step_count(),
        }
    }
}

/// Upper bound on samples reserved up front; longer runs grow on demand.
const MAX_PREALLOC_SAMPLES: usize = 1 << 16;

/// Record of simulation results.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimRecord {
    /// Initial sample followed by one sample per completed step
    pub samples: Vec<Sample>,
    /// Set when the finite-value guard stopped the run early
    pub divergence: Option<Divergence>,
}

impl SimRecord {
    pub fn is_complete(&self) -> bool {
        self.divergence.is_none()
    }

    /// The samples, or the divergence diagnostic if the run was cut short.
    pub fn into_complete(self) -> SimResult<Vec<Sample>> {
        match self.divergence {
            None => Ok(self.samples),
            Some(d) => Err(SimError::Diverged(Box::new(d))),
        }
    }
}

fn guard(
    x: &ThermalState,
    room_active: bool,
    step: usize,
    time_s: f64,
    phase: GuardPhase,
) -> Option<Divergence> {
    let err = x.ensure_finite(room_active).err()?;
    tracing::warn!(
        step,
        time_s,
        %phase,
        liquid_c = x.liquid_c,
        air_side_c = x.air_side_c,
        buffer_c = x.buffer_c,
        room_c = x.room_c,
        "non-finite temperature, aborting run"
    );
    Some(Divergence {
        step,
        time_s,
        phase,
        state: *x,
        cause: err.to_string(),
    })
}

/// Run a transient simulation with a fixed step.
///
/// Records the initial state at t = 0 and one sample per step. A non-finite
/// temperature before or after a step stops the run; the samples recorded so
/// far are kept and the diagnostic is attached to the record.
pub fn run_sim<I: Integrator + ?Sized>(integrator: &I, opts: &SimOptions) -> SimRecord {
    let room_active = integrator.room_active();
    let mut t = 0.0;
    let mut x = integrator.initial_state();

    let mut samples = Vec::with_capacity(opts.steps.saturating_add(1).min(MAX_PREALLOC_SAMPLES));
    samples.push(Sample::from_state(t, &x, room_active));

    tracing::debug!(steps = opts.steps, dt = opts.dt, room_active, "run started");

    for step in 0..opts.steps {
        if let Some(d) = guard(&x, room_active, step, t, GuardPhase::BeforeStep) {
            return SimRecord {
                samples,
                divergence: Some(d),
            };
        }

        x = integrator.step(&x, opts.dt);
        t += opts.dt;

        if let Some(d) = guard(&x, room_active, step, t, GuardPhase::AfterStep) {
            return SimRecord {
                samples,
                divergence: Some(d),
            };
        }

        samples.push(Sample::from_state(t, &x, room_active));
    }

    tracing::debug!(samples = samples.len(), t_end = t, "run finished");

    SimRecord {
        samples,
        divergence: None,
    }
}
