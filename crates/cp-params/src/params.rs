//! Simulation parameter bundle produced by the mapper.

use crate::raw::RawInputs;
use cp_core::numeric::finite_or;
use serde::{Deserialize, Serialize};

/// Default fixed timestep (s).
pub const DEFAULT_DT_S: f64 = 1.0;
/// Default simulated horizon (s).
pub const DEFAULT_HORIZON_S: f64 = 180.0;

/// Core scalars consumed by both integrators, plus the detailed bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Supply (initial water) temperature, °C
    pub t_supply_c: f64,
    /// Ambient temperature, °C
    pub t_env_c: f64,
    /// Total IT heat load, W
    pub q_load_w: f64,
    /// Share of the load on the liquid loop, in [0, 1]
    pub ratio_liquid: f64,

    /// Legacy lumped water-equivalent masses, kg
    pub m_liquid_kg: f64,
    pub m_air_side_kg: f64,
    pub m_pipe_kg: f64,

    /// Aggregate conductances, W/K
    pub ua_liquid_w_per_k: f64,
    pub ua_air_w_per_k: f64,
    pub ua_pipe_w_per_k: f64,

    /// Fixed timestep, s
    pub dt_s: f64,
    /// Total simulated time, s
    pub horizon_s: f64,
    /// Selects the flow-coupled model over the 3-node baseline.
    pub use_extended_model: bool,

    pub ext: ExtParams,
}

impl SimulationParameters {
    /// Attach run timing. Non-finite or non-positive `dt` and non-finite or
    /// negative horizons fall back to the defaults.
    pub fn with_timing(mut self, dt_s: f64, horizon_s: f64) -> Self {
        let dt = finite_or(Some(dt_s), DEFAULT_DT_S);
        let horizon = finite_or(Some(horizon_s), DEFAULT_HORIZON_S);

        self.dt_s = if dt > 0.0 { dt } else { DEFAULT_DT_S };
        self.horizon_s = if horizon >= 0.0 {
            horizon
        } else {
            DEFAULT_HORIZON_S
        };
        if self.dt_s != dt_s || self.horizon_s != horizon_s {
            tracing::warn!(
                dt_s,
                horizon_s,
                used_dt_s = self.dt_s,
                used_horizon_s = self.horizon_s,
                "run timing coerced to defaults"
            );
        }
        self
    }

    pub fn with_extended_model(mut self, enabled: bool) -> Self {
        self.use_extended_model = enabled;
        self
    }

    /// Number of fixed steps covering the horizon (at least one).
    pub fn step_count(&self) -> usize {
        let n = (self.horizon_s / self.dt_s).ceil();
        if n.is_finite() && n >= 1.0 {
            n as usize
        } else {
            1
        }
    }

    /// Whether the room-air node takes part in the extended model.
    pub fn room_active(&self) -> bool {
        self.ext.room.volume_m3 > 0.0
    }
}

/// Detailed parameter bundle used by the extended model and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtParams {
    /// Raw input record as received.
    pub raw: RawInputs,
    pub cp: MaterialProps,
    pub counts: UnitCounts,
    /// Detailed heat capacities, J/K
    pub heat_caps: NodeCapacities,
    /// Equivalent water masses, kg (diagnostic)
    pub water_equiv_kg: NodeCapacities,
    pub volumes_l: BufferVolumes,
    pub flows: Flows,
    pub air_flow_scaling: FlowScaling,
    pub ua_total: UaTotals,
    /// Exposed pipe area, m²
    pub pipe_area_m2: f64,
    pub room: RoomAir,
}

/// Specific heats in J/(kg·K) and air density in kg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProps {
    pub cp_water: f64,
    pub cp_copper: f64,
    pub cp_aluminum: f64,
    pub cp_air: f64,
    pub rho_air: f64,
}

/// Installed device counts (each at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCounts {
    /// Fan-wall units (air-side coils)
    pub fwu: u32,
    /// Coolant distribution units (liquid side)
    pub cdu: u32,
}

/// One value per water node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeCapacities {
    /// Air-side coil assembly (FWU)
    pub air_side: f64,
    /// Liquid-side assembly (TCS)
    pub liquid: f64,
    pub buffer: f64,
}

/// Buffer water volumes by source, litres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferVolumes {
    pub tank: f64,
    pub evaporation: f64,
    pub pipe_internal: f64,
    pub pipe_external: f64,
}

impl BufferVolumes {
    pub fn total(&self) -> f64 {
        self.tank + self.evaporation + self.pipe_internal + self.pipe_external
    }
}

/// Loop flows in engineering units and as water mass flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flows {
    pub air_lpm: f64,
    pub liquid_lpm: f64,
    pub air_kgps: f64,
    pub liquid_kgps: f64,
}

/// Air-side UA scaling `(flow / reference)^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowScaling {
    pub reference_kgps: f64,
    pub exponent: f64,
}

/// Aggregate conductances, W/K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UaTotals {
    pub liquid: f64,
    pub air: f64,
    pub pipe: f64,
}

/// Optional room-air node. Inactive when `volume_m3` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomAir {
    pub t_init_c: f64,
    pub volume_m3: f64,
    /// Room-to-environment conductance, W/K
    pub ua_w_per_k: f64,
}
