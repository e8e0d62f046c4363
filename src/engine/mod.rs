//! # Power Engine
//!
//! Pure, stateless AC power computation:
//!
//! - **power**: P, Q, S and quadrant of one phase
//! - **energy**: kWh, kVAh, kVARh over an interval
//! - **three_phase**: per-phase results and totals for R, Y, B
//! - **waveform**: sampled v(t), i(t), p(t) traces for plotting
//! - **phasor**: vector-diagram end points
//!
//! Every function takes its inputs by reference and returns a fresh value, so
//! the engine can be shared freely between threads.
//!
//! ## Usage
//!
//! ```rust
//! use ac_power_analyzer::domain::{PhaseMeasurement, QuadrantLabel};
//! use ac_power_analyzer::engine::{compute_energy, compute_power};
//!
//! let m = PhaseMeasurement::new(230.0, 10.0, 30.0).unwrap();
//! let p = compute_power(&m).unwrap();
//! let e = compute_energy(&p, 1.0).unwrap();
//!
//! assert_eq!(p.quadrant, QuadrantLabel::InductiveLoad);
//! assert!((e.kvah - 2.3).abs() < 1e-12);
//! ```

pub mod energy;
pub mod phasor;
pub mod power;
pub mod three_phase;
pub mod waveform;

pub use energy::compute_energy;
pub use crate::error::{EngineError, Result};
pub use phasor::{phasor, phasor_pair, three_phase_phasors};
pub use power::{compute_power, reactive_magnitude, sin_cos_deg};
pub use three_phase::{compute_three_phase, PhaseSequence, ThreePhaseReport, ThreePhaseSystem};
pub use waveform::{
    sample_three_phase_waveforms, sample_waveform, sample_with_offset, WaveformMode,
    WaveformSettings,
};

use serde::Serialize;

use crate::domain::{
    EnergyResult, PhaseMeasurement, PhasorPair, PowerResult, ReactiveEnergySplit, Waveform,
};

/// Everything a front end needs to present one phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePhaseReport {
    pub measurement: PhaseMeasurement,
    pub power: PowerResult,
    pub power_factor: f64,
    pub energy: EnergyResult,
    pub reactive_energy: ReactiveEnergySplit,
    pub phasors: PhasorPair,
    pub waveform: Waveform,
}

/// Everything a front end needs to present a three-phase system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreePhaseAnalysis {
    pub system: ThreePhaseSystem,
    pub report: ThreePhaseReport,
    pub power_factors: [f64; 3],
    pub vector_apparent_va: f64,
    pub active_unbalance_factor: f64,
    pub phasors: [PhasorPair; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waveforms: Option<[Waveform; 3]>,
}

/// Engine defaults applied when a caller leaves settings unspecified
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowerEngine {
    pub waveform: WaveformSettings,
    pub sequence: PhaseSequence,
}

impl PowerEngine {
    pub fn new(waveform: WaveformSettings, sequence: PhaseSequence) -> Result<Self> {
        waveform.validate()?;
        Ok(Self { waveform, sequence })
    }

    /// Build a system in R, Y, B order using the default phase sequence
    pub fn system(&self, phases: [PhaseMeasurement; 3]) -> ThreePhaseSystem {
        ThreePhaseSystem {
            phases,
            sequence: self.sequence,
        }
    }

    /// Power, energy, phasors and waveform of one phase.
    ///
    /// `waveform` overrides the engine's default sampling settings.
    pub fn analyze_single(
        &self,
        m: &PhaseMeasurement,
        hours: f64,
        waveform: Option<WaveformSettings>,
    ) -> Result<SinglePhaseReport> {
        let settings = waveform.unwrap_or(self.waveform);
        let power = compute_power(m)?;
        let energy = compute_energy(&power, hours)?;

        Ok(SinglePhaseReport {
            measurement: *m,
            power,
            power_factor: power.power_factor(),
            energy,
            reactive_energy: energy.split_reactive(),
            phasors: phasor_pair(m, 0.0)?,
            waveform: sample_waveform(m, &settings)?,
        })
    }

    /// Totals, phasors and optionally waveforms of a three-phase system
    pub fn analyze_three_phase(
        &self,
        system: &ThreePhaseSystem,
        hours: f64,
        waveform: Option<WaveformSettings>,
    ) -> Result<ThreePhaseAnalysis> {
        let report = compute_three_phase(system, hours)?;
        let waveforms = match waveform {
            Some(settings) => Some(sample_three_phase_waveforms(system, &settings)?),
            None => None,
        };

        Ok(ThreePhaseAnalysis {
            system: *system,
            power_factors: report.per_phase.map(|p| p.power_factor()),
            vector_apparent_va: report.vector_apparent_va(),
            active_unbalance_factor: report.active_unbalance_factor(),
            phasors: three_phase_phasors(system)?,
            waveforms,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_single() {
        let engine = PowerEngine::default();
        let m = PhaseMeasurement::new(230.0, 10.0, -30.0).unwrap();
        let report = engine.analyze_single(&m, 1.0, None).unwrap();

        assert!((report.power_factor - 0.866025).abs() < 1e-6);
        assert_eq!(report.reactive_energy.lagging_kvarh, 0.0);
        assert!((report.reactive_energy.leading_kvarh - 1.15).abs() < 1e-9);
        assert_eq!(report.waveform.len(), 1000);
    }

    #[test]
    fn test_waveform_override() {
        let engine = PowerEngine::default();
        let m = PhaseMeasurement::new(230.0, 10.0, 0.0).unwrap();
        let settings = WaveformSettings {
            sample_count: 50,
            ..Default::default()
        };
        let report = engine.analyze_single(&m, 1.0, Some(settings)).unwrap();
        assert_eq!(report.waveform.len(), 50);
    }

    #[test]
    fn test_analyze_three_phase() {
        let engine = PowerEngine::new(WaveformSettings::default(), PhaseSequence::Descending).unwrap();
        let m = PhaseMeasurement::new(230.0, 10.0, 0.0).unwrap();
        let system = engine.system([m, m, m]);
        assert_eq!(system.sequence, PhaseSequence::Descending);

        let analysis = engine.analyze_three_phase(&system, 1.0, None).unwrap();
        assert!(analysis.waveforms.is_none());
        assert_eq!(analysis.power_factors, [1.0, 1.0, 1.0]);
        assert!((analysis.vector_apparent_va - 6900.0).abs() < 1e-9);

        let analysis = engine
            .analyze_three_phase(&system, 1.0, Some(WaveformSettings::default()))
            .unwrap();
        assert!(analysis.waveforms.is_some());
    }

    #[test]
    fn test_engine_rejects_bad_defaults() {
        let settings = WaveformSettings {
            line_frequency_hz: -50.0,
            ..Default::default()
        };
        assert!(PowerEngine::new(settings, PhaseSequence::Ascending).is_err());
    }
}
