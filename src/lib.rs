//! # AC Power Analyzer
//!
//! Power, energy, quadrant, phasor and waveform computation for single- and
//! three-phase AC circuits, plus a small JSON service that exposes it.
//!
//! Phase angles are the angle by which current lags voltage: positive is
//! lagging (inductive), negative is leading (capacitive).

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use domain::{
    classify_quadrant, EnergyResult, PhaseLabel, PhaseMeasurement, PowerResult, PowerTotals,
    QuadrantLabel, Waveform,
};
pub use engine::{
    compute_energy, compute_power, compute_three_phase, sample_waveform, EngineError,
    PowerEngine, ThreePhaseSystem,
};
