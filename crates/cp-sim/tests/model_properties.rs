//! Integration tests: behavioural properties of both plant models.

use cp_core::numeric::{Tolerances, nearly_equal};
use cp_params::{RawInputs, SimulationParameters, map_inputs};
use cp_sim::{ExtendedIntegrator, GuardPhase, Integrator, Sample, SimRecord, run_model};
use proptest::prelude::*;

/// Form defaults of the reference data hall: 3850 kW, 80 % liquid,
/// 8 fan-wall units, 4 CDUs, room air enabled.
fn reference_inputs() -> RawInputs {
    RawInputs {
        q_total: Some(3850.0.into()),
        t_sup: Some(17.0.into()),
        t_env: Some(46.0.into()),
        ratio_liquid: Some(80.0.into()),
        fwu_units: Some(8.0.into()),
        cdu_units: Some(4.0.into()),
        flow_air_lpm: Some(324.0.into()),
        flow_liquid_lpm: Some(1200.0.into()),
        flow_air_ref_lpm: Some(324.0.into()),
        ua_air_flow_exponent: Some(0.7.into()),
        m_liquid: Some(120.0.into()),
        m_air: Some(100.0.into()),
        m_pipe: Some(60.0.into()),
        ua_liquid_per_unit: Some(32000.0.into()),
        ua_air_per_unit: Some(26000.0.into()),
        pipe_length: Some(30.0.into()),
        pipe_diameter: Some(0.1.into()),
        insulation_thickness: Some(0.05.into()),
        insulation_conductivity: Some(0.035.into()),
        h_external: Some(5.0.into()),
        env_factor: Some(1.0.into()),
        pipe_area: Some(5.0.into()),
        cp_water: Some(4.18.into()),
        cp_copper: Some(0.39.into()),
        cp_aluminum: Some(0.91.into()),
        coil_copper: Some(83.0.into()),
        coil_aluminum: Some(66.0.into()),
        coil_water: Some(78.0.into()),
        tcs_copper: Some(200.0.into()),
        tcs_aluminum: Some(200.0.into()),
        tcs_water: Some(200.0.into()),
        tank_volume: Some(3200.0.into()),
        evaporation_volume: Some(0.0.into()),
        pipe_internal_volume: Some(5000.0.into()),
        pipe_external_volume: Some(1000.0.into()),
        room_t_init: Some(25.0.into()),
        room_volume: Some(1317.84.into()),
        ua_room: Some(0.0.into()),
        ..Default::default()
    }
}

fn reference_params(extended: bool) -> SimulationParameters {
    map_inputs(&reference_inputs())
        .with_timing(1.0, 300.0)
        .with_extended_model(extended)
}

fn assert_uniform_time(samples: &[Sample], dt: f64) {
    for pair in samples.windows(2) {
        let step = pair[1].time_s - pair[0].time_s;
        assert!((step - dt).abs() < 1e-9, "step {step} != {dt}");
    }
}

#[test]
fn end_to_end_reference_hall() {
    let p = reference_params(true);
    let rec = run_model(&p);

    assert!(rec.is_complete(), "{:?}", rec.divergence);
    assert_eq!(rec.samples.len(), 301);
    for s in &rec.samples {
        assert!(s.is_finite());
        assert!(s.liquid_c < 200.0 && s.air_side_c < 200.0);
        assert!(s.liquid_c >= 17.0 - 1e-9);
    }
    let last = rec.samples.last().unwrap();
    assert_eq!(last.time_s, 300.0);
    assert!(last.room_c.is_some());
    // heat flows from the loads into the buffer
    assert!(last.liquid_c > last.buffer_c);
    assert!(last.buffer_c > 17.0);
}

#[test]
fn initial_sample_is_configured_state() {
    let ext = run_model(&reference_params(true));
    let s0 = ext.samples[0];
    assert_eq!(s0.time_s, 0.0);
    assert_eq!(s0.liquid_c, 17.0);
    assert_eq!(s0.air_side_c, 17.0);
    assert_eq!(s0.buffer_c, 17.0);
    assert_eq!(s0.room_c, Some(25.0));

    let basic = run_model(&reference_params(false));
    let b0 = basic.samples[0];
    assert_eq!((b0.time_s, b0.liquid_c, b0.room_c), (0.0, 17.0, None));
}

fn sample_bits(rec: &SimRecord) -> Vec<[u64; 5]> {
    rec.samples
        .iter()
        .map(|s| {
            [
                s.time_s.to_bits(),
                s.liquid_c.to_bits(),
                s.air_side_c.to_bits(),
                s.buffer_c.to_bits(),
                s.room_c.map_or(u64::MAX, f64::to_bits),
            ]
        })
        .collect()
}

#[test]
fn both_models_are_deterministic() {
    for extended in [false, true] {
        let p = reference_params(extended);
        assert_eq!(sample_bits(&run_model(&p)), sample_bits(&run_model(&p)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn repeated_runs_are_bit_identical(
        q_total_kw in 0.0_f64..5000.0,
        ratio_pct in 0.0_f64..100.0,
        flow_air_lpm in 0.0_f64..2000.0,
        flow_liquid_lpm in 0.0_f64..2000.0,
        extended in any::<bool>(),
    ) {
        let mut raw = reference_inputs();
        raw.q_total = Some(q_total_kw.into());
        raw.ratio_liquid = Some(ratio_pct.into());
        raw.flow_air_lpm = Some(flow_air_lpm.into());
        raw.flow_liquid_lpm = Some(flow_liquid_lpm.into());
        let p = map_inputs(&raw)
            .with_timing(1.0, 60.0)
            .with_extended_model(extended);

        let a = run_model(&p);
        let b = run_model(&p);
        prop_assert_eq!(sample_bits(&a), sample_bits(&b));
        prop_assert_eq!(
            a.divergence.map(|d| (d.step, d.phase)),
            b.divergence.map(|d| (d.step, d.phase))
        );
    }
}

#[test]
fn time_advances_by_dt() {
    for extended in [false, true] {
        let p = map_inputs(&reference_inputs())
            .with_timing(0.5, 20.0)
            .with_extended_model(extended);
        let rec = run_model(&p);
        assert_eq!(rec.samples.len(), 41);
        assert_uniform_time(&rec.samples, 0.5);
    }
}

#[test]
fn basic_air_side_constant_with_full_liquid_share() {
    let mut p = reference_params(false);
    p.ratio_liquid = 1.0;
    p.ua_air_w_per_k = 0.0;
    let rec = run_model(&p);
    assert!(rec.is_complete());
    for s in &rec.samples {
        assert_eq!(s.air_side_c, 17.0);
    }
}

#[test]
fn extended_buffer_decays_to_environment_without_flow() {
    let raw = RawInputs {
        t_sup: Some(20.0.into()),
        t_env: Some(35.0.into()),
        tank_volume: Some(500.0.into()),
        pipe_length: Some(30.0.into()),
        pipe_diameter: Some(0.1.into()),
        insulation_thickness: Some(0.05.into()),
        ..Default::default()
    };
    let p = map_inputs(&raw).with_timing(1.0, 600.0).with_extended_model(true);
    let integ = ExtendedIntegrator::new(&p);
    let c = integ.buffer_capacity();
    let ua = p.ua_pipe_w_per_k;
    assert!(c > 0.0 && ua > 0.0);

    let rec = integ.run(&cp_sim::SimOptions::from_params(&p));
    assert!(rec.is_complete());

    let rate = ua / c;
    let tol = Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    };
    for s in &rec.samples {
        let n = s.time_s;
        // Backward Euler: (T - T_env) shrinks by 1/(1 + k dt) per step.
        let implicit = 35.0 - 15.0 * (1.0 + rate).powf(-n);
        assert!(nearly_equal(s.buffer_c, implicit, tol));
        // Continuous single-node reference: first-order agreement.
        let exact = 35.0 - 15.0 * (-rate * n).exp();
        assert!((s.buffer_c - exact).abs() < 1e-3);
    }
    assert!(rec.samples.last().unwrap().buffer_c > 20.0);
}

#[test]
fn room_gating_without_room_volume() {
    let mut raw = reference_inputs();
    raw.room_volume = Some(0.0.into());
    let p = map_inputs(&raw).with_timing(1.0, 60.0).with_extended_model(true);

    let integ = ExtendedIntegrator::new(&p);
    assert!(p.ext.ua_total.air > 0.0);
    assert_eq!(integ.ua_air_active(), 0.0);
    assert!(!integ.room_active());

    let rec = integ.run(&cp_sim::SimOptions::from_params(&p));
    assert!(rec.is_complete());
    for s in &rec.samples {
        assert_eq!(s.room_c, None);
    }
    // Without pickup from the room the air-side only follows the buffer.
    let last = rec.samples.last().unwrap();
    assert!(last.air_side_c <= last.buffer_c + 1e-9);
}

#[test]
fn malformed_buffer_capacity_trips_guard() {
    let mut p = map_inputs(&RawInputs::default())
        .with_timing(1.0, 300.0)
        .with_extended_model(true);
    p.ua_pipe_w_per_k = 100.0;
    // C/dt + G_L + G_A + UA_P = 0
    p.ext.heat_caps.buffer = -100.0;

    let rec = run_model(&p);
    let nominal = p.step_count() + 1;
    assert!(rec.samples.len() < nominal);
    assert_eq!(rec.samples.len(), 1);

    let d = rec.divergence.expect("divergence diagnostic");
    assert_eq!(d.step, 0);
    assert_eq!(d.phase, GuardPhase::AfterStep);
    assert_eq!(d.time_s, 1.0);
    assert!(d.state.buffer_c.is_nan());
    assert!(d.cause.contains("buffer"));
}

#[test]
fn near_singular_buffer_blows_up_within_horizon() {
    let mut p = map_inputs(&RawInputs::default())
        .with_timing(1.0, 300.0)
        .with_extended_model(true);
    p.ua_pipe_w_per_k = 100.0;
    p.ext.heat_caps.buffer = -100.0 + 1e-9;

    let rec = run_model(&p);
    assert!(!rec.is_complete());
    assert!(rec.samples.len() > 1);
    assert!(rec.samples.len() < p.step_count() + 1);
    assert!(rec.samples.iter().all(Sample::is_finite));
}
