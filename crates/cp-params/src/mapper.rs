//! Raw inputs → simulation parameters.
//!
//! The mapping never fails: each missing or non-numeric field resolves to the
//! default listed next to it.

use crate::params::*;
use crate::pipe_ua::PipeExposure;
use crate::raw::{RawInputs, number};
use cp_core::numeric::{clamp_unit, finite_or, magnitude_or};
use cp_core::units::{
    constants, kj_per_kg_k, kw, lpm_water_to_kgps, m, m2, w_per_m_k, w_per_m2_k,
};

pub mod defaults {
    pub const CP_WATER_KJ: f64 = 4.18;
    pub const CP_COPPER_KJ: f64 = 0.39;
    pub const CP_ALUMINUM_KJ: f64 = 0.91;

    pub const T_SUPPLY_C: f64 = 17.0;
    pub const T_ENV_C: f64 = 35.0;
    pub const RATIO_LIQUID_PCT: f64 = 60.0;

    pub const M_LIQUID_KG: f64 = 120.0;
    pub const M_AIR_KG: f64 = 100.0;
    pub const M_PIPE_KG: f64 = 60.0;

    pub const K_INSULATION: f64 = 0.035;
    pub const H_EXTERNAL: f64 = 5.0;
    pub const ENV_FACTOR: f64 = 1.0;

    pub const UA_AIR_FLOW_EXPONENT: f64 = 0.7;
    pub const T_ROOM_INIT_C: f64 = 17.0;
}

/// Material make-up of one device assembly (kg of each material).
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembly {
    pub water_kg: f64,
    pub copper_kg: f64,
    pub aluminum_kg: f64,
}

impl Assembly {
    /// Multiply every material mass by the installed unit count.
    pub fn times(self, units: u32) -> Self {
        let n = f64::from(units);
        Self {
            water_kg: self.water_kg * n,
            copper_kg: self.copper_kg * n,
            aluminum_kg: self.aluminum_kg * n,
        }
    }

    /// Heat capacity in J/K.
    pub fn heat_capacity(&self, cp: &MaterialProps) -> f64 {
        self.water_kg * cp.cp_water
            + self.copper_kg * cp.cp_copper
            + self.aluminum_kg * cp.cp_aluminum
    }
}

fn unit_count(v: Option<f64>) -> u32 {
    let n = finite_or(v, 1.0).round().max(1.0);
    // Saturating cast for absurdly large counts.
    n.min(f64::from(u32::MAX)) as u32
}

/// Map raw engineering inputs to a fully populated parameter bundle.
pub fn map_inputs(raw: &RawInputs) -> SimulationParameters {
    // cp in SI
    let cp = MaterialProps {
        cp_water: kj_per_kg_k(magnitude_or(number(&raw.cp_water), defaults::CP_WATER_KJ)).value,
        cp_copper: kj_per_kg_k(magnitude_or(number(&raw.cp_copper), defaults::CP_COPPER_KJ))
            .value,
        cp_aluminum: kj_per_kg_k(magnitude_or(number(&raw.cp_aluminum), defaults::CP_ALUMINUM_KJ))
            .value,
        cp_air: constants::CP_AIR_J_PER_KG_K,
        rho_air: constants::RHO_AIR_KG_PER_M3,
    };

    let counts = UnitCounts {
        fwu: unit_count(number(&raw.fwu_units)),
        cdu: unit_count(number(&raw.cdu_units)),
    };

    let coil = Assembly {
        water_kg: magnitude_or(number(&raw.coil_water), 0.0),
        copper_kg: magnitude_or(number(&raw.coil_copper), 0.0),
        aluminum_kg: magnitude_or(number(&raw.coil_aluminum), 0.0),
    }
    .times(counts.fwu);
    let tcs = Assembly {
        water_kg: magnitude_or(number(&raw.tcs_water), 0.0),
        copper_kg: magnitude_or(number(&raw.tcs_copper), 0.0),
        aluminum_kg: magnitude_or(number(&raw.tcs_aluminum), 0.0),
    }
    .times(counts.cdu);

    let volumes_l = BufferVolumes {
        tank: magnitude_or(number(&raw.tank_volume), 0.0),
        evaporation: magnitude_or(number(&raw.evaporation_volume), 0.0),
        pipe_internal: magnitude_or(number(&raw.pipe_internal_volume), 0.0),
        pipe_external: magnitude_or(number(&raw.pipe_external_volume), 0.0),
    };
    let buffer_water_kg = volumes_l.total() * constants::WATER_KG_PER_L;

    let heat_caps = NodeCapacities {
        air_side: coil.heat_capacity(&cp),
        liquid: tcs.heat_capacity(&cp),
        buffer: buffer_water_kg * cp.cp_water,
    };
    let water_equiv_kg = NodeCapacities {
        air_side: water_equivalent(heat_caps.air_side, cp.cp_water),
        liquid: water_equivalent(heat_caps.liquid, cp.cp_water),
        buffer: buffer_water_kg,
    };

    // Legacy lumped masses only stand in when the detailed figures are zero.
    let m_liquid_kg = if heat_caps.liquid > 0.0 {
        water_equiv_kg.liquid
    } else {
        magnitude_or(number(&raw.m_liquid), defaults::M_LIQUID_KG)
    };
    let m_air_side_kg = if heat_caps.air_side > 0.0 {
        water_equiv_kg.air_side
    } else {
        magnitude_or(number(&raw.m_air), defaults::M_AIR_KG)
    };
    let m_pipe_kg = if volumes_l.pipe_external > 0.0 {
        volumes_l.pipe_external * constants::WATER_KG_PER_L
    } else {
        magnitude_or(number(&raw.m_pipe), defaults::M_PIPE_KG)
    };

    let pipe_area_m2 = magnitude_or(number(&raw.pipe_area), 0.0);
    let pipe = PipeExposure {
        // Length falls back to the external pipe volume figure when absent.
        length: m(magnitude_or(
            number(&raw.pipe_length).or_else(|| number(&raw.pipe_external_volume)),
            0.0,
        )),
        outer_diameter: m(magnitude_or(number(&raw.pipe_diameter), 0.0)),
        insulation_thickness: m(magnitude_or(number(&raw.insulation_thickness), 0.0)),
        insulation_k: w_per_m_k(magnitude_or(
            number(&raw.insulation_conductivity),
            defaults::K_INSULATION,
        )),
        h_external: w_per_m2_k(magnitude_or(number(&raw.h_external), defaults::H_EXTERNAL)),
        env_factor: magnitude_or(number(&raw.env_factor), defaults::ENV_FACTOR),
        area: m2(pipe_area_m2),
    };

    let ua_total = UaTotals {
        liquid: magnitude_or(number(&raw.ua_liquid_per_unit), 0.0) * f64::from(counts.cdu),
        air: magnitude_or(number(&raw.ua_air_per_unit), 0.0) * f64::from(counts.fwu),
        pipe: finite_or(Some(pipe.ua().value), 0.0).max(0.0),
    };

    let air_lpm = magnitude_or(number(&raw.flow_air_lpm), 0.0);
    let liquid_lpm = magnitude_or(number(&raw.flow_liquid_lpm), 0.0);
    let flows = Flows {
        air_lpm,
        liquid_lpm,
        air_kgps: lpm_water_to_kgps(air_lpm).value,
        liquid_kgps: lpm_water_to_kgps(liquid_lpm).value,
    };
    let air_flow_scaling = FlowScaling {
        reference_kgps: lpm_water_to_kgps(magnitude_or(number(&raw.flow_air_ref_lpm), air_lpm))
            .value,
        exponent: finite_or(
            number(&raw.ua_air_flow_exponent),
            defaults::UA_AIR_FLOW_EXPONENT,
        ),
    };

    let room = RoomAir {
        t_init_c: finite_or(number(&raw.room_t_init), defaults::T_ROOM_INIT_C),
        volume_m3: magnitude_or(number(&raw.room_volume), 0.0),
        ua_w_per_k: magnitude_or(number(&raw.ua_room), 0.0),
    };

    let params = SimulationParameters {
        t_supply_c: finite_or(number(&raw.t_sup), defaults::T_SUPPLY_C),
        t_env_c: finite_or(number(&raw.t_env), defaults::T_ENV_C),
        q_load_w: kw(magnitude_or(number(&raw.q_total), 0.0)).value,
        ratio_liquid: clamp_unit(
            finite_or(number(&raw.ratio_liquid), defaults::RATIO_LIQUID_PCT) / 100.0,
        ),
        m_liquid_kg,
        m_air_side_kg,
        m_pipe_kg,
        ua_liquid_w_per_k: ua_total.liquid,
        ua_air_w_per_k: ua_total.air,
        ua_pipe_w_per_k: ua_total.pipe,
        dt_s: DEFAULT_DT_S,
        horizon_s: DEFAULT_HORIZON_S,
        use_extended_model: false,
        ext: ExtParams {
            raw: raw.clone(),
            cp,
            counts,
            heat_caps,
            water_equiv_kg,
            volumes_l,
            flows,
            air_flow_scaling,
            ua_total,
            pipe_area_m2,
            room,
        },
    };

    tracing::debug!(
        fwu = counts.fwu,
        cdu = counts.cdu,
        c_air_side_mj_per_k = heat_caps.air_side / 1e6,
        c_liquid_mj_per_k = heat_caps.liquid / 1e6,
        c_buffer_mj_per_k = heat_caps.buffer / 1e6,
        ua_liquid = ua_total.liquid,
        ua_air = ua_total.air,
        ua_pipe = ua_total.pipe,
        flow_air_kgps = flows.air_kgps,
        flow_liquid_kgps = flows.liquid_kgps,
        room_volume_m3 = room.volume_m3,
        "mapped simulation parameters"
    );

    params
}

fn water_equivalent(c: f64, cp_water: f64) -> f64 {
    if cp_water > 0.0 { c / cp_water } else { 0.0 }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        map_inputs(&RawInputs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawValue;
    use cp_core::numeric::{Tolerances, nearly_equal};

    fn close(a: f64, b: f64) -> bool {
        nearly_equal(a, b, Tolerances::default())
    }

    #[test]
    fn empty_input_uses_defaults() {
        let p = map_inputs(&RawInputs::default());
        assert_eq!(p.t_supply_c, 17.0);
        assert_eq!(p.t_env_c, 35.0);
        assert_eq!(p.q_load_w, 0.0);
        assert!(close(p.ratio_liquid, 0.6));
        assert_eq!(p.m_liquid_kg, 120.0);
        assert_eq!(p.m_air_side_kg, 100.0);
        assert_eq!(p.m_pipe_kg, 60.0);
        assert_eq!(p.ext.counts, UnitCounts { fwu: 1, cdu: 1 });
        assert!(close(p.ext.cp.cp_water, 4180.0));
        assert!(close(p.ext.cp.cp_copper, 390.0));
        assert!(close(p.ext.cp.cp_aluminum, 910.0));
        assert!(close(p.ext.air_flow_scaling.exponent, 0.7));
        assert_eq!(p.ext.room.t_init_c, 17.0);
        assert_eq!(p.ua_pipe_w_per_k, 0.0);
        assert!(!p.room_active());
    }

    #[test]
    fn non_numeric_fields_fall_back() {
        let raw = RawInputs {
            t_sup: Some("warm".into()),
            t_env: Some(RawValue::Number(f64::NAN)),
            fwu_units: Some(RawValue::Flag(true)),
            cp_water: Some("".into()),
            ..Default::default()
        };
        let p = map_inputs(&raw);
        assert_eq!(p.t_supply_c, 17.0);
        assert_eq!(p.t_env_c, 35.0);
        assert_eq!(p.ext.counts.fwu, 1);
        assert!(close(p.ext.cp.cp_water, 4180.0));
    }

    #[test]
    fn ratio_is_clamped() {
        let hi = map_inputs(&RawInputs {
            ratio_liquid: Some(150.0.into()),
            ..Default::default()
        });
        let lo = map_inputs(&RawInputs {
            ratio_liquid: Some((-20.0).into()),
            ..Default::default()
        });
        assert_eq!(hi.ratio_liquid, 1.0);
        assert_eq!(lo.ratio_liquid, 0.0);
    }

    #[test]
    fn assembly_capacity_scales_with_units() {
        let raw = RawInputs {
            fwu_units: Some(8.0.into()),
            coil_copper: Some(83.0.into()),
            coil_aluminum: Some(66.0.into()),
            coil_water: Some(78.0.into()),
            ..Default::default()
        };
        let p = map_inputs(&raw);
        let per_unit = 78.0 * 4180.0 + 83.0 * 390.0 + 66.0 * 910.0;
        assert!(close(p.ext.heat_caps.air_side, 8.0 * per_unit));
        assert!(close(p.ext.water_equiv_kg.air_side, 8.0 * per_unit / 4180.0));
        assert!(close(p.m_air_side_kg, p.ext.water_equiv_kg.air_side));
        // liquid side had no detail: legacy mass stands in
        assert_eq!(p.ext.heat_caps.liquid, 0.0);
        assert_eq!(p.m_liquid_kg, 120.0);
    }

    #[test]
    fn buffer_capacity_from_volumes() {
        let raw = RawInputs {
            tank_volume: Some(3200.0.into()),
            pipe_internal_volume: Some(5000.0.into()),
            pipe_external_volume: Some(1000.0.into()),
            ..Default::default()
        };
        let p = map_inputs(&raw);
        assert_eq!(p.ext.volumes_l.total(), 9200.0);
        assert!(close(p.ext.heat_caps.buffer, 9200.0 * 4180.0));
        assert_eq!(p.ext.water_equiv_kg.buffer, 9200.0);
        assert_eq!(p.m_pipe_kg, 1000.0);
    }

    #[test]
    fn ua_totals_multiply_unit_counts() {
        let raw = RawInputs {
            cdu_units: Some(4.0.into()),
            fwu_units: Some(8.0.into()),
            ua_liquid_per_unit: Some(32000.0.into()),
            ua_air_per_unit: Some(26000.0.into()),
            ..Default::default()
        };
        let p = map_inputs(&raw);
        assert_eq!(p.ua_liquid_w_per_k, 128_000.0);
        assert_eq!(p.ua_air_w_per_k, 208_000.0);
        assert_eq!(p.ext.ua_total.liquid, p.ua_liquid_w_per_k);
    }

    #[test]
    fn flows_convert_and_reference_defaults_to_current() {
        let raw = RawInputs {
            flow_air_lpm: Some(324.0.into()),
            flow_liquid_lpm: Some(1200.0.into()),
            ..Default::default()
        };
        let p = map_inputs(&raw);
        assert!(close(p.ext.flows.air_kgps, 5.4));
        assert!(close(p.ext.flows.liquid_kgps, 20.0));
        assert!(close(p.ext.air_flow_scaling.reference_kgps, 5.4));

        let with_ref = map_inputs(&RawInputs {
            flow_air_ref_lpm: Some(600.0.into()),
            ..raw
        });
        assert!(close(with_ref.ext.air_flow_scaling.reference_kgps, 10.0));
    }

    #[test]
    fn pipe_ua_from_geometry() {
        let raw = RawInputs {
            pipe_length: Some(30.0.into()),
            pipe_diameter: Some(0.1.into()),
            insulation_thickness: Some(0.05.into()),
            pipe_area: Some(5.0.into()),
            ..Default::default()
        };
        let p = map_inputs(&raw);
        assert!((p.ua_pipe_w_per_k - 8.644_917_704_731_458).abs() < 1e-9);
        assert_eq!(p.ext.pipe_area_m2, 5.0);
    }

    #[test]
    fn raw_record_is_preserved() {
        let raw = RawInputs {
            q_total: Some("3850".into()),
            n_exp: Some(0.8.into()),
            ..Default::default()
        };
        let p = map_inputs(&raw);
        assert_eq!(p.ext.raw, raw);
        assert_eq!(p.q_load_w, 3_850_000.0);
    }
}
