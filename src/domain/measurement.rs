use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::fmt;
use strum::{Display, EnumIter, EnumString};

use crate::error::{ensure_non_negative, EngineError, Result};

/// Conductor label of a three-phase system
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum PhaseLabel {
    R,
    Y,
    B,
}

impl PhaseLabel {
    pub const ALL: [PhaseLabel; 3] = [PhaseLabel::R, PhaseLabel::Y, PhaseLabel::B];

    /// Position in the R, Y, B ordering
    pub fn index(&self) -> usize {
        match self {
            Self::R => 0,
            Self::Y => 1,
            Self::B => 2,
        }
    }
}

/// RMS voltage, RMS current and the angle by which current lags voltage.
///
/// Positive angles are lagging (inductive), negative angles leading (capacitive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseMeasurement {
    /// RMS voltage (V)
    pub voltage_rms: f64,
    /// RMS current (A)
    pub current_rms: f64,
    /// Current lag relative to voltage (degrees, -180..=180)
    pub angle_deg: f64,
}

impl PhaseMeasurement {
    /// Create a validated measurement
    pub fn new(voltage_rms: f64, current_rms: f64, angle_deg: f64) -> Result<Self> {
        let m = Self {
            voltage_rms,
            current_rms,
            angle_deg,
        };
        m.validate()?;
        Ok(m)
    }

    /// Create from peak magnitudes of sinusoidal voltage and current
    pub fn from_peak(voltage_peak: f64, current_peak: f64, angle_deg: f64) -> Result<Self> {
        ensure_non_negative("voltage_peak", voltage_peak)?;
        ensure_non_negative("current_peak", current_peak)?;
        Self::new(voltage_peak / SQRT_2, current_peak / SQRT_2, angle_deg)
    }

    /// Check magnitudes and angle range
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("voltage_rms", self.voltage_rms)?;
        ensure_non_negative("current_rms", self.current_rms)?;
        if !self.angle_deg.is_finite() {
            return Err(EngineError::invalid(
                "angle_deg",
                self.angle_deg,
                "must be finite",
            ));
        }
        if !(-180.0..=180.0).contains(&self.angle_deg) {
            return Err(EngineError::invalid(
                "angle_deg",
                self.angle_deg,
                "must be within [-180, 180]",
            ));
        }
        Ok(())
    }

    pub fn voltage_peak(&self) -> f64 {
        self.voltage_rms * SQRT_2
    }

    pub fn current_peak(&self) -> f64 {
        self.current_rms * SQRT_2
    }

    pub fn angle_rad(&self) -> f64 {
        self.angle_deg.to_radians()
    }
}

impl fmt::Display for PhaseMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} V, {:.2} A @ {:.1}°",
            self.voltage_rms, self.current_rms, self.angle_deg
        )
    }
}
