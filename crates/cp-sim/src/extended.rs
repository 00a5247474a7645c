//! Flow-coupled model with optional room-air node.
//!
//! Liquid and air-side loops exchange with the buffer through flow
//! conductances `G = ṁ cp`. The air-side coil picks up the air share of the IT
//! load from the room node through a flow-scaled UA.
//!
//! Per step:
//! 1. explicit predictor for liquid, air-side and room using the current
//!    buffer and room temperatures;
//! 2. backward-Euler update of the buffer against the predicted loop
//!    temperatures and the environment (instantaneous mixing when the buffer
//!    has no capacity).

use crate::implicit::ImplicitSystem;
use crate::integrator::Integrator;
use crate::state::ThermalState;
use cp_params::SimulationParameters;

#[derive(Clone, Debug)]
pub struct ExtendedIntegrator {
    t_supply_c: f64,
    t_env_c: f64,
    t_room_init_c: f64,
    room_active: bool,
    q_liquid_w: f64,
    q_air_w: f64,
    /// Node capacities, J/K
    c_liquid: f64,
    c_air_side: f64,
    c_buffer: f64,
    c_room: f64,
    /// Conductances, W/K
    g_liquid: f64,
    g_air: f64,
    ua_air: f64,
    ua_room: f64,
    ua_pipe: f64,
}

/// Detailed capacity, or the legacy lumped mass when it is zero.
fn capacity_or_legacy(detailed: f64, mass_kg: f64, cp_water: f64) -> f64 {
    if detailed != 0.0 {
        detailed
    } else {
        mass_kg * cp_water
    }
}

/// Air-side UA multiplier `(ṁ / ṁ_ref)^n`. Zero without air-side flow.
pub fn air_flow_scale(flow_kgps: f64, reference_kgps: f64, exponent: f64) -> f64 {
    let reference = if reference_kgps > 0.0 {
        reference_kgps
    } else if flow_kgps > 0.0 {
        flow_kgps
    } else {
        1.0
    };
    if flow_kgps > 0.0 {
        (flow_kgps / reference).powf(exponent)
    } else {
        0.0
    }
}

#[inline]
fn rate(q_w: f64, c: f64) -> f64 {
    if c > 0.0 { q_w / c } else { 0.0 }
}

impl ExtendedIntegrator {
    pub fn new(params: &SimulationParameters) -> Self {
        let ext = &params.ext;
        let cp_water = ext.cp.cp_water;
        let room_active = params.room_active();

        let scale = air_flow_scale(
            ext.flows.air_kgps,
            ext.air_flow_scaling.reference_kgps,
            ext.air_flow_scaling.exponent,
        );

        Self {
            t_supply_c: params.t_supply_c,
            t_env_c: params.t_env_c,
            t_room_init_c: ext.room.t_init_c,
            room_active,
            q_liquid_w: params.q_load_w * params.ratio_liquid,
            q_air_w: params.q_load_w * (1.0 - params.ratio_liquid),
            c_liquid: capacity_or_legacy(ext.heat_caps.liquid, params.m_liquid_kg, cp_water),
            c_air_side: capacity_or_legacy(ext.heat_caps.air_side, params.m_air_side_kg, cp_water),
            c_buffer: capacity_or_legacy(ext.heat_caps.buffer, params.m_pipe_kg, cp_water),
            c_room: if room_active {
                ext.cp.rho_air * ext.room.volume_m3 * ext.cp.cp_air
            } else {
                0.0
            },
            g_liquid: ext.flows.liquid_kgps * cp_water,
            g_air: ext.flows.air_kgps * cp_water,
            // No room node, no air-side pickup.
            ua_air: if room_active { ext.ua_total.air * scale } else { 0.0 },
            ua_room: ext.room.ua_w_per_k,
            ua_pipe: params.ua_pipe_w_per_k,
        }
    }

    /// Effective room → air-side conductance (W/K).
    pub fn ua_air_active(&self) -> f64 {
        self.ua_air
    }

    /// Buffer capacity used by the implicit update (J/K).
    pub fn buffer_capacity(&self) -> f64 {
        self.c_buffer
    }

    fn update_buffer(&self, t_buffer: f64, t_liquid: f64, t_air_side: f64, dt: f64) -> f64 {
        if self.c_buffer == 0.0 {
            let w_sum = self.g_liquid + self.g_air + self.ua_pipe;
            if w_sum > 0.0 {
                return (self.g_liquid * t_liquid
                    + self.g_air * t_air_side
                    + self.ua_pipe * self.t_env_c)
                    / w_sum;
            }
            return t_buffer;
        }

        let mut sys = ImplicitSystem::new();
        let buf = sys.add_node(self.c_buffer, t_buffer);
        sys.link(buf, self.g_liquid, t_liquid)
            .link(buf, self.g_air, t_air_side)
            .link(buf, self.ua_pipe, self.t_env_c);

        match sys.solve(dt) {
            Some(x) => x[buf],
            None => {
                tracing::warn!(c_buffer = self.c_buffer, dt, "singular buffer update");
                f64::NAN
            }
        }
    }
}

impl Integrator for ExtendedIntegrator {
    fn initial_state(&self) -> ThermalState {
        ThermalState {
            liquid_c: self.t_supply_c,
            air_side_c: self.t_supply_c,
            buffer_c: self.t_supply_c,
            room_c: self.t_room_init_c,
        }
    }

    fn room_active(&self) -> bool {
        self.room_active
    }

    fn step(&self, x: &ThermalState, dt: f64) -> ThermalState {
        // predictor (explicit) with current buffer and room
        let q_mix_liquid = self.g_liquid * (x.buffer_c - x.liquid_c);
        let q_mix_air = self.g_air * (x.buffer_c - x.air_side_c);

        let (q_room_air, room_c) = if self.room_active {
            let q_room_air = self.ua_air * (x.room_c - x.air_side_c);
            let q_env_room = self.ua_room * (self.t_env_c - x.room_c);
            let room = x.room_c + rate(self.q_air_w - q_room_air + q_env_room, self.c_room) * dt;
            (q_room_air, room)
        } else {
            (0.0, x.room_c)
        };

        let liquid_c = x.liquid_c + rate(self.q_liquid_w + q_mix_liquid, self.c_liquid) * dt;
        let air_side_c = x.air_side_c + rate(q_mix_air + q_room_air, self.c_air_side) * dt;

        // corrector (implicit) for the buffer
        let buffer_c = self.update_buffer(x.buffer_c, liquid_c, air_side_c, dt);

        ThermalState {
            liquid_c,
            air_side_c,
            buffer_c,
            room_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_core::numeric::{Tolerances, nearly_equal};

    #[test]
    fn flow_scale_cases() {
        let tol = Tolerances::default();
        assert!(nearly_equal(air_flow_scale(5.4, 5.4, 0.7), 1.0, tol));
        assert!(nearly_equal(air_flow_scale(2.0, 4.0, 1.0), 0.5, tol));
        assert!(nearly_equal(air_flow_scale(2.0, 0.0, 0.7), 1.0, tol));
        assert_eq!(air_flow_scale(0.0, 5.4, 0.7), 0.0);
    }

    #[test]
    fn capacity_falls_back_only_on_zero() {
        assert_eq!(capacity_or_legacy(5.0e6, 100.0, 4180.0), 5.0e6);
        assert_eq!(capacity_or_legacy(0.0, 100.0, 4180.0), 418_000.0);
        assert_eq!(capacity_or_legacy(-10.0, 100.0, 4180.0), -10.0);
    }

    #[test]
    fn mixing_limit_without_buffer_capacity() {
        let mut p = SimulationParameters::default();
        p.m_pipe_kg = 0.0;
        p.ext.flows.liquid_kgps = 2.0;
        p.ext.flows.air_kgps = 1.0;
        p.ua_pipe_w_per_k = 0.0;
        let integ = ExtendedIntegrator::new(&p);
        assert_eq!(integ.buffer_capacity(), 0.0);

        let t = integ.update_buffer(20.0, 30.0, 24.0, 1.0);
        assert!(nearly_equal(t, 28.0, Tolerances::default()));
    }

    #[test]
    fn mixing_limit_keeps_temperature_without_weights() {
        let mut p = SimulationParameters::default();
        p.m_pipe_kg = 0.0;
        let integ = ExtendedIntegrator::new(&p);
        assert_eq!(integ.update_buffer(21.5, 30.0, 24.0, 1.0), 21.5);
    }
}
