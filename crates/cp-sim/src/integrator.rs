//! Fixed-step node integrators.

use crate::sim::{SimOptions, SimRecord, run_sim};
use crate::state::ThermalState;

/// A thermal-node model advanced with a fixed timestep.
///
/// Implementors only describe one step; the stepping loop, terminal
/// condition and finite-value guard live in [`run_sim`].
pub trait Integrator {
    /// State at t = 0.
    fn initial_state(&self) -> ThermalState;

    /// Whether the room-air node is evolved and recorded.
    fn room_active(&self) -> bool;

    /// Advance the state by `dt` seconds.
    fn step(&self, x: &ThermalState, dt: f64) -> ThermalState;

    /// Run the whole horizon and return the recorded series.
    fn run(&self, opts: &SimOptions) -> SimRecord {
        run_sim(self, opts)
    }
}
