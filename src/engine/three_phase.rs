//! # Three-Phase Aggregation
//!
//! A three-phase system is three independent phase measurements (R, Y, B).
//! Each phase is computed on its own; there is no mutual coupling and no
//! neutral-current model.
//!
//! ## Totals
//!
//! Active and reactive totals are plain sums. The apparent total is also the
//! arithmetic sum of per-phase S, not |ΣP + jΣQ|:
//!
//! - R: 230 V, 10 A, 0°    → S = 2300 VA
//! - Y: 230 V, 10 A, -120° → S = 2300 VA
//! - B: 230 V, 10 A, 120°  → S = 2300 VA
//! - **Scalar total**: 6900 VA
//! - **Vector total**: 0 VA (P and Q both cancel)
//!
//! Both are reported; `totals.apparent_va` carries the scalar sum.
//!
//! ## Voltage Offsets
//!
//! The per-phase voltage angle from [`PhaseSequence`] is geometry only. It
//! rotates phasors and shifts waveforms but never enters the power sums.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::{
    EnergyResult, PhaseLabel, PhaseMeasurement, PowerResult, PowerTotals,
};

use super::energy::compute_energy;
use crate::error::{ensure_finite, Result};
use super::power::compute_power;

/// Voltage angle assignment for R, Y, B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhaseSequence {
    /// R = 0°, Y = 120°, B = 240°
    #[default]
    Ascending,
    /// R = 0°, Y = -120°, B = 120°
    Descending,
}

impl PhaseSequence {
    pub fn voltage_offsets_deg(&self) -> [f64; 3] {
        match self {
            Self::Ascending => [0.0, 120.0, 240.0],
            Self::Descending => [0.0, -120.0, 120.0],
        }
    }

    pub fn offset_deg(&self, phase: PhaseLabel) -> f64 {
        self.voltage_offsets_deg()[phase.index()]
    }
}

/// Three phase measurements in R, Y, B order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePhaseSystem {
    pub phases: [PhaseMeasurement; 3],
    #[serde(default)]
    pub sequence: PhaseSequence,
}

impl ThreePhaseSystem {
    pub fn new(r: PhaseMeasurement, y: PhaseMeasurement, b: PhaseMeasurement) -> Self {
        Self {
            phases: [r, y, b],
            sequence: PhaseSequence::default(),
        }
    }

    /// Same magnitudes on every phase, each with its own angle
    pub fn balanced(voltage_rms: f64, current_rms: f64, angles_deg: [f64; 3]) -> Result<Self> {
        Ok(Self::new(
            PhaseMeasurement::new(voltage_rms, current_rms, angles_deg[0])?,
            PhaseMeasurement::new(voltage_rms, current_rms, angles_deg[1])?,
            PhaseMeasurement::new(voltage_rms, current_rms, angles_deg[2])?,
        ))
    }

    pub fn with_sequence(mut self, sequence: PhaseSequence) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn phase(&self, label: PhaseLabel) -> &PhaseMeasurement {
        &self.phases[label.index()]
    }

    pub fn validate(&self) -> Result<()> {
        self.phases.iter().try_for_each(PhaseMeasurement::validate)
    }
}

/// Per-phase and total power and energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePhaseReport {
    pub per_phase: [PowerResult; 3],
    pub per_phase_energy: [EnergyResult; 3],
    pub totals: PowerTotals,
    pub total_energy: EnergyResult,
}

impl ThreePhaseReport {
    pub fn phase(&self, label: PhaseLabel) -> &PowerResult {
        &self.per_phase[label.index()]
    }

    /// |ΣP + jΣQ| (VA)
    pub fn vector_apparent_va(&self) -> f64 {
        self.totals.vector_apparent_va()
    }

    /// Active power unbalance (0.0 = balanced, 1.0 = all on one phase)
    ///
    /// Calculated as: (max - min) / (max + min + 1e-9) over |P| per phase
    pub fn active_unbalance_factor(&self) -> f64 {
        let magnitudes = self.per_phase.map(|p| p.active_w.abs());
        let max = magnitudes.iter().cloned().fold(f64::MIN, f64::max);
        let min = magnitudes.iter().cloned().fold(f64::MAX, f64::min);
        (max - min) / (max + min + 1e-9)
    }

    /// Phase carrying the largest apparent power
    pub fn most_loaded_phase(&self) -> PhaseLabel {
        let mut best = PhaseLabel::R;
        for label in PhaseLabel::ALL {
            if self.phase(label).apparent_va > self.phase(best).apparent_va {
                best = label;
            }
        }
        best
    }
}

/// Compute every phase independently, then sum
pub fn compute_three_phase(system: &ThreePhaseSystem, hours: f64) -> Result<ThreePhaseReport> {
    let [r, y, b] = &system.phases;
    let per_phase = [compute_power(r)?, compute_power(y)?, compute_power(b)?];
    let per_phase_energy = [
        compute_energy(&per_phase[0], hours)?,
        compute_energy(&per_phase[1], hours)?,
        compute_energy(&per_phase[2], hours)?,
    ];

    let totals: PowerTotals = per_phase.iter().map(PowerResult::totals).sum();
    let total_energy: EnergyResult = per_phase_energy.iter().copied().sum();
    ensure_finite("total_apparent_va", totals.apparent_va)?;
    ensure_finite("total_kvah", total_energy.kvah)?;

    tracing::debug!(
        total_active_w = totals.active_w,
        total_reactive_var = totals.reactive_var,
        total_apparent_va = totals.apparent_va,
        hours,
        "computed three-phase totals"
    );

    Ok(ThreePhaseReport {
        per_phase,
        per_phase_energy,
        totals,
        total_energy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuadrantLabel;

    #[test]
    fn test_balanced_load_cancels_active_power() {
        let system = ThreePhaseSystem::balanced(230.0, 10.0, [0.0, -120.0, 120.0]).unwrap();
        let report = compute_three_phase(&system, 1.0).unwrap();

        assert_eq!(report.per_phase[0].active_w, 2300.0);
        assert!((report.per_phase[1].active_w + 1150.0).abs() < 1e-9);
        assert!((report.per_phase[2].active_w + 1150.0).abs() < 1e-9);
        assert!(report.totals.active_w.abs() < 1e-9);
        assert!((report.totals.apparent_va - 6900.0).abs() < 1e-9);
        assert!(report.vector_apparent_va() < 1e-6);
    }

    #[test]
    fn test_quadrant_reported_per_phase() {
        let system = ThreePhaseSystem::balanced(230.0, 10.0, [30.0, -30.0, 150.0]).unwrap();
        let report = compute_three_phase(&system, 1.0).unwrap();
        assert_eq!(report.phase(PhaseLabel::R).quadrant, QuadrantLabel::InductiveLoad);
        assert_eq!(report.phase(PhaseLabel::Y).quadrant, QuadrantLabel::CapacitiveLoad);
        assert_eq!(report.phase(PhaseLabel::B).quadrant, QuadrantLabel::GeneratorLag);
    }

    #[test]
    fn test_sequence_does_not_change_power() {
        let base = ThreePhaseSystem::balanced(230.0, 10.0, [10.0, 20.0, 30.0]).unwrap();
        let a = compute_three_phase(&base, 2.0).unwrap();
        let b = compute_three_phase(&base.with_sequence(PhaseSequence::Descending), 2.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_total_energy() {
        let system = ThreePhaseSystem::balanced(230.0, 10.0, [0.0, 0.0, 0.0]).unwrap();
        let report = compute_three_phase(&system, 2.0).unwrap();
        assert!((report.total_energy.kwh - 13.8).abs() < 1e-9);
        assert_eq!(report.total_energy.kvarh, 0.0);
    }

    #[test]
    fn test_unbalance_factor() {
        let balanced = ThreePhaseSystem::balanced(230.0, 10.0, [0.0, 0.0, 0.0]).unwrap();
        let report = compute_three_phase(&balanced, 1.0).unwrap();
        assert!(report.active_unbalance_factor() < 0.01);

        let unbalanced = ThreePhaseSystem::new(
            PhaseMeasurement::new(230.0, 26.0, 0.0).unwrap(),
            PhaseMeasurement::new(230.0, 0.0, 0.0).unwrap(),
            PhaseMeasurement::new(230.0, 0.0, 0.0).unwrap(),
        );
        let report = compute_three_phase(&unbalanced, 1.0).unwrap();
        assert!(report.active_unbalance_factor() > 0.9);
        assert_eq!(report.most_loaded_phase(), PhaseLabel::R);
    }

    #[test]
    fn test_invalid_phase_fails_whole_computation() {
        let mut system = ThreePhaseSystem::balanced(230.0, 10.0, [0.0, 0.0, 0.0]).unwrap();
        system.phases[2].current_rms = -1.0;
        assert!(system.validate().is_err());
        assert!(compute_three_phase(&system, 1.0).is_err());
    }

    #[test]
    fn test_overflowing_totals_rejected() {
        let system = ThreePhaseSystem::balanced(1e154, 1e154, [0.0, 0.0, 0.0]).unwrap();
        let err = compute_three_phase(&system, 0.0).unwrap_err();
        assert_eq!(err.argument(), "total_apparent_va");
    }

    #[test]
    fn test_sequence_offsets() {
        assert_eq!(PhaseSequence::Ascending.offset_deg(PhaseLabel::B), 240.0);
        assert_eq!(PhaseSequence::Descending.offset_deg(PhaseLabel::Y), -120.0);
    }

    #[test]
    fn test_serde_default_sequence() {
        let json = r#"{"phases":[
            {"voltage_rms":230.0,"current_rms":10.0,"angle_deg":0.0},
            {"voltage_rms":230.0,"current_rms":10.0,"angle_deg":0.0},
            {"voltage_rms":230.0,"current_rms":10.0,"angle_deg":0.0}]}"#;
        let system: ThreePhaseSystem = serde_json::from_str(json).unwrap();
        assert_eq!(system.sequence, PhaseSequence::Ascending);
    }
}
