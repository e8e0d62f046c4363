//! Vector-diagram end points.
//!
//! Voltage is drawn at the phase's voltage offset, current at the offset minus
//! the lag angle, so a lagging current sits clockwise of its voltage.

use crate::domain::{PhaseMeasurement, Phasor, PhasorPair};

use crate::error::Result;
use super::power::sin_cos_deg;
use super::three_phase::ThreePhaseSystem;

/// Polar to rectangular, with the angle normalised to (-180, 180]
pub fn phasor(magnitude: f64, angle_deg: f64) -> Phasor {
    let angle_deg = normalize_deg(angle_deg);
    let (sin, cos) = sin_cos_deg(angle_deg);
    Phasor {
        magnitude,
        angle_deg,
        x: magnitude * cos,
        y: magnitude * sin,
    }
}

/// Voltage and current vectors of one phase, in RMS units
pub fn phasor_pair(m: &PhaseMeasurement, voltage_offset_deg: f64) -> Result<PhasorPair> {
    m.validate()?;
    Ok(PhasorPair {
        voltage: phasor(m.voltage_rms, voltage_offset_deg),
        current: phasor(m.current_rms, voltage_offset_deg - m.angle_deg),
    })
}

/// R, Y, B vectors with the system's voltage offsets applied
pub fn three_phase_phasors(system: &ThreePhaseSystem) -> Result<[PhasorPair; 3]> {
    let offsets = system.sequence.voltage_offsets_deg();
    let [r, y, b] = &system.phases;
    Ok([
        phasor_pair(r, offsets[0])?,
        phasor_pair(y, offsets[1])?,
        phasor_pair(b, offsets[2])?,
    ])
}

fn normalize_deg(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
