//! Engine behaviour across the whole input range.

use ac_power_analyzer::domain::{PhaseMeasurement, QuadrantLabel};
use ac_power_analyzer::engine::{
    compute_energy, compute_power, compute_three_phase, sample_three_phase_waveforms,
    sample_waveform, ThreePhaseSystem, WaveformSettings,
};
use proptest::prelude::*;
use rstest::rstest;

fn measurement(v: f64, i: f64, angle: f64) -> PhaseMeasurement {
    PhaseMeasurement::new(v, i, angle).unwrap()
}

#[rstest]
#[case(0.0, QuadrantLabel::InductiveLoad)]
#[case(45.0, QuadrantLabel::InductiveLoad)]
#[case(90.0, QuadrantLabel::InductiveLoad)]
#[case(135.0, QuadrantLabel::GeneratorLag)]
#[case(180.0, QuadrantLabel::GeneratorLag)]
#[case(-180.0, QuadrantLabel::GeneratorLead)]
#[case(-135.0, QuadrantLabel::GeneratorLead)]
#[case(-90.0, QuadrantLabel::CapacitiveLoad)]
#[case(-45.0, QuadrantLabel::CapacitiveLoad)]
#[case(200.0, QuadrantLabel::Unknown)]
#[case(-200.0, QuadrantLabel::Unknown)]
fn quadrant_classification(#[case] angle: f64, #[case] expected: QuadrantLabel) {
    assert_eq!(QuadrantLabel::classify(angle), expected);
}

#[test]
fn scenario_thirty_degrees_one_hour() {
    let p = compute_power(&measurement(230.0, 10.0, 30.0)).unwrap();
    let e = compute_energy(&p, 1.0).unwrap();

    assert_eq!(p.apparent_va, 2300.0);
    assert!((p.active_w - 1991.86).abs() < 0.01);
    assert!((p.reactive_var - 1150.0).abs() < 1e-9);
    assert!((e.kwh - 1.99186).abs() < 1e-5);
    assert!((e.kvah - 2.3).abs() < 1e-12);
    assert!((e.kvarh - 1.15).abs() < 1e-12);
    assert_eq!(p.quadrant, QuadrantLabel::InductiveLoad);
}

#[test]
fn scenario_unity_power_factor() {
    let p = compute_power(&measurement(230.0, 10.0, 0.0)).unwrap();
    let e = compute_energy(&p, 1.0).unwrap();

    assert_eq!(p.active_w, 2300.0);
    assert_eq!(p.reactive_var, 0.0);
    assert_eq!(p.apparent_va, 2300.0);
    assert_eq!(e.kvarh, 0.0);
    assert_eq!(p.quadrant, QuadrantLabel::InductiveLoad);
}

#[test]
fn scenario_balanced_three_phase() {
    let system = ThreePhaseSystem::balanced(230.0, 10.0, [0.0, -120.0, 120.0]).unwrap();
    let report = compute_three_phase(&system, 1.0).unwrap();

    assert_eq!(report.per_phase[0].active_w, 2300.0);
    assert!((report.per_phase[1].active_w - -1150.0).abs() < 1e-9);
    assert!((report.per_phase[2].active_w - -1150.0).abs() < 1e-9);
    assert!(report.totals.active_w.abs() < 1e-9);
}

#[rstest]
#[case(0.0)]
#[case(180.0)]
#[case(-180.0)]
fn resistive_angles_have_zero_reactive_power(#[case] angle: f64) {
    let p = compute_power(&measurement(230.0, 10.0, angle)).unwrap();
    assert!(p.reactive_var.abs() <= 1e-9 * p.apparent_va);
    assert_eq!(p.apparent_va, p.active_w.abs());
}

#[rstest]
#[case(0.0)]
#[case(30.0)]
#[case(90.0)]
#[case(150.0)]
#[case(-45.0)]
#[case(-180.0)]
fn waveform_average_matches_active_power(#[case] angle: f64) {
    let m = measurement(230.0, 10.0, angle);
    let p = compute_power(&m).unwrap();
    let w = sample_waveform(&m, &WaveformSettings::default()).unwrap();

    let average = w.average_power();
    // at 90° P is zero, so fall back to a tolerance relative to S
    let tolerance = 0.01 * p.active_w.abs() + 1e-6 * p.apparent_va;
    assert!(
        (average - p.active_w).abs() <= tolerance,
        "angle {angle}: average {average} vs active {}",
        p.active_w
    );
}

#[test]
fn sampled_reactive_magnitude_matches_closed_form() {
    let m = measurement(230.0, 10.0, 60.0);
    let p = compute_power(&m).unwrap();
    let w = sample_waveform(&m, &WaveformSettings::default()).unwrap();
    let sampled = w.sampled_power(p.apparent_va);

    assert!((sampled.active_w - p.active_w).abs() / p.active_w < 0.01);
    assert!((sampled.reactive_var_magnitude - p.reactive_var.abs()).abs() / p.reactive_var < 0.01);
}

#[test]
fn three_phase_offsets_only_shift_waveforms() {
    let system = ThreePhaseSystem::balanced(230.0, 10.0, [30.0, 30.0, 30.0]).unwrap();
    let report = compute_three_phase(&system, 1.0).unwrap();
    let waves = sample_three_phase_waveforms(&system, &WaveformSettings::default()).unwrap();

    for (wave, power) in waves.iter().zip(report.per_phase.iter()) {
        assert!((wave.average_power() - power.active_w).abs() / power.active_w < 0.01);
    }
    // Y starts 120° ahead of R
    assert!(waves[1].voltage[0] > 0.0);
    assert_eq!(waves[0].voltage[0], 0.0);
}

fn angle() -> impl Strategy<Value = f64> {
    -180.0..=180.0f64
}

proptest! {
    #[test]
    fn apparent_power_is_the_hypotenuse(v in 0.0..1000.0f64, i in 0.0..500.0f64, a in angle()) {
        let p = compute_power(&measurement(v, i, a)).unwrap();
        prop_assert!(p.apparent_va >= 0.0);
        let lhs = p.apparent_va * p.apparent_va;
        let rhs = p.active_w * p.active_w + p.reactive_var * p.reactive_var;
        prop_assert!((lhs - rhs).abs() <= 1e-9 * lhs.max(1.0));
        prop_assert!(p.active_w.abs() <= p.apparent_va * (1.0 + 1e-12));
        prop_assert!(p.reactive_var.abs() <= p.apparent_va * (1.0 + 1e-12));
    }

    #[test]
    fn quadrant_is_known_inside_range(a in angle()) {
        prop_assert_ne!(QuadrantLabel::classify(a), QuadrantLabel::Unknown);
    }

    #[test]
    fn energy_is_linear_in_hours(v in 0.0..1000.0f64, i in 0.0..500.0f64, a in angle(), h in 0.0..1000.0f64) {
        let p = compute_power(&measurement(v, i, a)).unwrap();
        let once = compute_energy(&p, h).unwrap();
        let twice = compute_energy(&p, 2.0 * h).unwrap();
        let tol = |x: f64| 1e-9 * x.abs().max(1.0);
        prop_assert!((twice.kwh - 2.0 * once.kwh).abs() <= tol(twice.kwh));
        prop_assert!((twice.kvah - 2.0 * once.kvah).abs() <= tol(twice.kvah));
        prop_assert!((twice.kvarh - 2.0 * once.kvarh).abs() <= tol(twice.kvarh));
    }

    #[test]
    fn three_phase_totals_are_sums(
        vs in prop::array::uniform3(0.0..500.0f64),
        is in prop::array::uniform3(0.0..100.0f64),
        angles in prop::array::uniform3(-180.0..=180.0f64),
        h in 0.0..24.0f64,
    ) {
        let system = ThreePhaseSystem::new(
            measurement(vs[0], is[0], angles[0]),
            measurement(vs[1], is[1], angles[1]),
            measurement(vs[2], is[2], angles[2]),
        );
        let report = compute_three_phase(&system, h).unwrap();
        let p = &report.per_phase;
        prop_assert_eq!(report.totals.active_w, p[0].active_w + p[1].active_w + p[2].active_w);
        prop_assert_eq!(report.totals.reactive_var, p[0].reactive_var + p[1].reactive_var + p[2].reactive_var);
        prop_assert_eq!(report.totals.apparent_va, p[0].apparent_va + p[1].apparent_va + p[2].apparent_va);
        let e = &report.per_phase_energy;
        prop_assert_eq!(report.total_energy.kwh, e[0].kwh + e[1].kwh + e[2].kwh);
    }
}
