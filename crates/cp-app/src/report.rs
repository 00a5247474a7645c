//! Post-processing of a temperature series.
//!
//! Everything here works on sanitised samples and the mapped parameter
//! bundle. Capacities are the mapped node heat capacities, and the room
//! capacity is `rho_air V_room cp_air`.

use cp_core::{joules_to_kwh, watts_to_kw};
use cp_params::SimulationParameters;
use cp_sim::Sample;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Keep only samples with finite time and temperatures. Returns the kept
/// samples and the number dropped.
pub fn sanitize(samples: &[Sample]) -> (Vec<Sample>, usize) {
    let kept: Vec<Sample> = samples.iter().copied().filter(Sample::is_finite).collect();
    let dropped = samples.len() - kept.len();
    if dropped > 0 {
        tracing::warn!(dropped, "non-finite samples removed from series");
    }
    (kept, dropped)
}

/// Derived parameters worth showing next to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDigest {
    /// Heat capacities, MJ/K
    pub c_liquid_mj_per_k: f64,
    pub c_air_side_mj_per_k: f64,
    pub c_buffer_mj_per_k: f64,
    /// Aggregate UA values, W/K
    pub ua_liquid_w_per_k: f64,
    pub ua_air_w_per_k: f64,
    pub ua_pipe_w_per_k: f64,
    pub liquid_flow_kgps: f64,
    pub air_flow_kgps: f64,
    pub air_flow_ref_kgps: f64,
    pub air_flow_exponent: f64,
    pub room_volume_m3: f64,
    pub room_t_init_c: f64,
}

impl ParameterDigest {
    pub fn from_params(params: &SimulationParameters) -> Self {
        let ext = &params.ext;
        Self {
            c_liquid_mj_per_k: ext.heat_caps.liquid / 1.0e6,
            c_air_side_mj_per_k: ext.heat_caps.air_side / 1.0e6,
            c_buffer_mj_per_k: ext.heat_caps.buffer / 1.0e6,
            ua_liquid_w_per_k: ext.ua_total.liquid,
            ua_air_w_per_k: ext.ua_total.air,
            ua_pipe_w_per_k: ext.ua_total.pipe,
            liquid_flow_kgps: ext.flows.liquid_kgps,
            air_flow_kgps: ext.flows.air_kgps,
            air_flow_ref_kgps: ext.air_flow_scaling.reference_kgps,
            air_flow_exponent: ext.air_flow_scaling.exponent,
            room_volume_m3: ext.room.volume_m3,
            room_t_init_c: ext.room.t_init_c,
        }
    }
}

/// Summary of a run's start and end state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub sample_count: usize,
    /// Observed time step (`t1 - t0`), zero for single-sample series
    pub dt_s: f64,
    pub duration_s: f64,
    pub buffer_initial_c: f64,
    pub buffer_final_c: f64,
    pub liquid_initial_c: f64,
    pub liquid_final_c: f64,
    pub air_side_initial_c: f64,
    pub air_side_final_c: f64,
    /// Final liquid minus final buffer temperature
    pub liquid_delta_t_k: f64,
    /// Final air-side minus final buffer temperature
    pub air_side_delta_t_k: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_initial_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_final_c: Option<f64>,
    pub digest: ParameterDigest,
}

fn ends(samples: &[Sample]) -> AppResult<(&Sample, &Sample)> {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(AppError::InvalidInput(
            "No finite samples in series".to_string(),
        )),
    }
}

pub fn run_summary(samples: &[Sample], params: &SimulationParameters) -> AppResult<RunSummary> {
    let (first, last) = ends(samples)?;
    let dt_s = samples
        .get(1)
        .map(|second| second.time_s - first.time_s)
        .unwrap_or(0.0);

    Ok(RunSummary {
        sample_count: samples.len(),
        dt_s,
        duration_s: last.time_s,
        buffer_initial_c: first.buffer_c,
        buffer_final_c: last.buffer_c,
        liquid_initial_c: first.liquid_c,
        liquid_final_c: last.liquid_c,
        air_side_initial_c: first.air_side_c,
        air_side_final_c: last.air_side_c,
        liquid_delta_t_k: last.liquid_c - last.buffer_c,
        air_side_delta_t_k: last.air_side_c - last.buffer_c,
        room_initial_c: first.room_c,
        room_final_c: last.room_c,
        digest: ParameterDigest::from_params(params),
    })
}

/// Node heat capacities used for storage terms (J/K).
#[derive(Debug, Clone, Copy)]
struct Capacities {
    liquid: f64,
    air_side: f64,
    buffer: f64,
    room: f64,
}

impl Capacities {
    fn from_params(params: &SimulationParameters) -> Self {
        let ext = &params.ext;
        Self {
            liquid: ext.heat_caps.liquid,
            air_side: ext.heat_caps.air_side,
            buffer: ext.heat_caps.buffer,
            room: ext.room.volume_m3 * ext.cp.rho_air * ext.cp.cp_air,
        }
    }

    /// Per-node `C ΔT` for a pair of samples (J). The room term is zero
    /// unless both samples carry a room temperature.
    fn energy_between(&self, from: &Sample, to: &Sample) -> NodeEnergy {
        let room = match (from.room_c, to.room_c) {
            (Some(a), Some(b)) => self.room * (b - a),
            _ => 0.0,
        };
        NodeEnergy {
            liquid: self.liquid * (to.liquid_c - from.liquid_c),
            air_side: self.air_side * (to.air_side_c - from.air_side_c),
            buffer: self.buffer * (to.buffer_c - from.buffer_c),
            room,
        }
    }
}

/// One value per thermal node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeEnergy {
    pub liquid: f64,
    pub air_side: f64,
    pub buffer: f64,
    pub room: f64,
}

impl NodeEnergy {
    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            liquid: f(self.liquid),
            air_side: f(self.air_side),
            buffer: f(self.buffer),
            room: f(self.room),
        }
    }

    pub fn total(&self) -> f64 {
        self.liquid + self.air_side + self.buffer + self.room
    }
}

/// Instantaneous heat flows at one sample, kW. Positive in the named
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatFlowSample {
    pub time_s: f64,
    pub liquid_to_buffer_kw: f64,
    pub air_side_to_buffer_kw: f64,
    pub room_to_air_side_kw: f64,
    pub env_to_buffer_kw: f64,
    /// Storage rates `C dT/dt`, kW (positive while heating up)
    pub storage_kw: NodeEnergy,
}

/// Heat-flow breakdown for every sample.
///
/// Storage rates use a backward difference; the first sample differences
/// against itself and reports zero.
pub fn heat_flows(samples: &[Sample], params: &SimulationParameters) -> Vec<HeatFlowSample> {
    let ext = &params.ext;
    let cp_water = ext.cp.cp_water;
    let g_liquid = ext.flows.liquid_kgps * cp_water;
    let g_air = ext.flows.air_kgps * cp_water;
    let ua_air = ext.ua_total.air;
    let ua_pipe = ext.ua_total.pipe;
    let caps = Capacities::from_params(params);

    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let prev = if i > 0 { &samples[i - 1] } else { s };
            let dt = if i > 0 { s.time_s - prev.time_s } else { 1.0 };
            let storage = caps
                .energy_between(prev, s)
                .map(|e| watts_to_kw(e / dt));

            HeatFlowSample {
                time_s: s.time_s,
                liquid_to_buffer_kw: watts_to_kw(g_liquid * (s.liquid_c - s.buffer_c)),
                air_side_to_buffer_kw: watts_to_kw(g_air * (s.air_side_c - s.buffer_c)),
                room_to_air_side_kw: watts_to_kw(ua_air * (s.room_or_air_side() - s.air_side_c)),
                env_to_buffer_kw: watts_to_kw(ua_pipe * (params.t_env_c - s.buffer_c)),
                storage_kw: storage,
            }
        })
        .collect()
}

/// Stored energy over the run and the storage power at its end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    /// `C (T_last - T_first)` per node, kWh
    pub stored_kwh: NodeEnergy,
    /// Storage power over the last interval, kW
    pub final_power_kw: NodeEnergy,
}

pub fn energy_summary(
    samples: &[Sample],
    params: &SimulationParameters,
) -> AppResult<EnergySummary> {
    let (first, last) = ends(samples)?;
    let caps = Capacities::from_params(params);

    let prev = samples
        .len()
        .checked_sub(2)
        .map_or(first, |i| &samples[i]);
    let dt = last.time_s - prev.time_s;
    let dt = if dt > 0.0 { dt } else { 1.0 };

    Ok(EnergySummary {
        stored_kwh: caps.energy_between(first, last).map(joules_to_kwh),
        final_power_kw: caps
            .energy_between(prev, last)
            .map(|e| watts_to_kw(e / dt)),
    })
}
