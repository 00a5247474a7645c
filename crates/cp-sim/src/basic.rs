//! Reduced 3-node baseline: liquid, air-side and buffer, no inter-node coupling.
//!
//! Liquid and air-side reject heat against the supply temperature through
//! their aggregate UA; the buffer only exchanges with the environment. Each
//! node advances independently with explicit Euler.

use crate::integrator::Integrator;
use crate::state::ThermalState;
use cp_params::SimulationParameters;

/// Water specific heat the baseline applies to the lumped masses, J/(kg·K).
pub const LEGACY_CP_WATER: f64 = 4186.0;

#[derive(Clone, Debug)]
pub struct BasicIntegrator {
    t_supply_c: f64,
    t_env_c: f64,
    q_liquid_w: f64,
    q_air_w: f64,
    /// Node capacities, J/K
    c_liquid: f64,
    c_air_side: f64,
    c_buffer: f64,
    ua_liquid: f64,
    ua_air: f64,
    ua_pipe: f64,
}

impl BasicIntegrator {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            t_supply_c: params.t_supply_c,
            t_env_c: params.t_env_c,
            q_liquid_w: params.q_load_w * params.ratio_liquid,
            q_air_w: params.q_load_w * (1.0 - params.ratio_liquid),
            c_liquid: params.m_liquid_kg * LEGACY_CP_WATER,
            c_air_side: params.m_air_side_kg * LEGACY_CP_WATER,
            c_buffer: params.m_pipe_kg * LEGACY_CP_WATER,
            ua_liquid: params.ua_liquid_w_per_k,
            ua_air: params.ua_air_w_per_k,
            ua_pipe: params.ua_pipe_w_per_k,
        }
    }
}

impl Integrator for BasicIntegrator {
    fn initial_state(&self) -> ThermalState {
        ThermalState {
            liquid_c: self.t_supply_c,
            air_side_c: self.t_supply_c,
            buffer_c: self.t_supply_c,
            room_c: self.t_supply_c,
        }
    }

    fn room_active(&self) -> bool {
        false
    }

    fn step(&self, x: &ThermalState, dt: f64) -> ThermalState {
        let q_loss_liquid = self.ua_liquid * (x.liquid_c - self.t_supply_c);
        let q_loss_air = self.ua_air * (x.air_side_c - self.t_supply_c);
        // Buffer gains from the environment only.
        let q_env = self.ua_pipe * (self.t_env_c - x.buffer_c);

        ThermalState {
            liquid_c: x.liquid_c + (self.q_liquid_w - q_loss_liquid) * dt / self.c_liquid,
            air_side_c: x.air_side_c + (self.q_air_w - q_loss_air) * dt / self.c_air_side,
            buffer_c: x.buffer_c + q_env * dt / self.c_buffer,
            room_c: x.room_c,
        }
    }
}
