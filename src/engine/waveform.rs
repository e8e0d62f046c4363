//! Sampled voltage, current and instantaneous power traces.
//!
//! Voltage is `V̂·sin(ωt + φv)` and current `Î·sin(ωt + φv − θ)`, where θ is the
//! lag angle of the measurement and φv the voltage offset of the phase. The
//! same sign of θ is used by [`compute_power`](super::power::compute_power), so
//! the time-average of a peak-mode trace over whole cycles equals its active power.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};
use strum::{Display, EnumString};

use crate::domain::{PhaseMeasurement, SampledPower, Waveform};

use crate::error::{ensure_finite, ensure_positive, EngineError, Result};
use super::power::reactive_magnitude;
use super::three_phase::ThreePhaseSystem;

/// Amplitude convention of sampled traces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WaveformMode {
    /// Amplitude = RMS × √2, the physical waveform
    #[default]
    Peak,
    /// Amplitude = RMS value. Averages to half the active power.
    ///
    /// Current still lags by θ as in `Peak`; only the amplitude differs.
    Rms,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformSettings {
    pub line_frequency_hz: f64,
    pub cycles: f64,
    pub sample_count: usize,
    pub mode: WaveformMode,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            line_frequency_hz: 50.0,
            cycles: 1.0,
            sample_count: 1000,
            mode: WaveformMode::Peak,
        }
    }
}

impl WaveformSettings {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("line_frequency_hz", self.line_frequency_hz)?;
        ensure_positive("cycles", self.cycles)?;
        if self.sample_count == 0 {
            return Err(EngineError::invalid(
                "sample_count",
                0.0,
                "must be positive",
            ));
        }
        // each value may be fine on its own while the ratio overflows or underflows
        ensure_positive("duration_seconds", self.duration_seconds())?;
        ensure_positive("angular_frequency", self.angular_frequency())?;
        Ok(())
    }

    /// Length of the sampled window (s)
    pub fn duration_seconds(&self) -> f64 {
        self.cycles / self.line_frequency_hz
    }

    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI * self.line_frequency_hz
    }

    /// `sample_count` evenly spaced instants over `[0, duration]`, both ends included
    pub fn time_points(&self) -> Vec<f64> {
        let n = self.sample_count;
        if n < 2 {
            return vec![0.0; n];
        }
        let step = self.duration_seconds() / (n - 1) as f64;
        (0..n).map(|k| k as f64 * step).collect()
    }
}

/// Sample one phase with its voltage at zero phase
pub fn sample_waveform(m: &PhaseMeasurement, settings: &WaveformSettings) -> Result<Waveform> {
    sample_with_offset(m, settings, 0.0)
}

/// Sample one phase whose voltage is shifted by `voltage_offset_deg`.
///
/// The offset only moves the traces in time; it never changes power.
pub fn sample_with_offset(
    m: &PhaseMeasurement,
    settings: &WaveformSettings,
    voltage_offset_deg: f64,
) -> Result<Waveform> {
    m.validate()?;
    settings.validate()?;

    let (v_amp, i_amp) = match settings.mode {
        WaveformMode::Peak => (m.voltage_rms * SQRT_2, m.current_rms * SQRT_2),
        WaveformMode::Rms => (m.voltage_rms, m.current_rms),
    };
    ensure_finite("peak_power", v_amp * i_amp)?;
    let omega = settings.angular_frequency();
    let phi_v = voltage_offset_deg.to_radians();
    let theta = m.angle_rad();

    let time_seconds = settings.time_points();
    let mut voltage = Vec::with_capacity(time_seconds.len());
    let mut current = Vec::with_capacity(time_seconds.len());
    let mut instantaneous_power = Vec::with_capacity(time_seconds.len());

    for &t in &time_seconds {
        let v = v_amp * (omega * t + phi_v).sin();
        let i = i_amp * (omega * t + phi_v - theta).sin();
        voltage.push(v);
        current.push(i);
        instantaneous_power.push(v * i);
    }

    tracing::trace!(
        samples = time_seconds.len(),
        mode = %settings.mode,
        voltage_offset_deg,
        "sampled waveform"
    );

    Ok(Waveform {
        time_seconds,
        voltage,
        current,
        instantaneous_power,
    })
}

/// Sample R, Y and B with the voltage offsets of the system's phase sequence
pub fn sample_three_phase_waveforms(
    system: &ThreePhaseSystem,
    settings: &WaveformSettings,
) -> Result<[Waveform; 3]> {
    let offsets = system.sequence.voltage_offsets_deg();
    let [r, y, b] = &system.phases;
    Ok([
        sample_with_offset(r, settings, offsets[0])?,
        sample_with_offset(y, settings, offsets[1])?,
        sample_with_offset(b, settings, offsets[2])?,
    ])
}

impl Waveform {
    /// Power recovered from the samples: mean power plus sqrt(S² - P²).
    ///
    /// Only meaningful for peak-mode traces spanning whole cycles. The reactive
    /// part has no sign; use [`compute_power`](super::power::compute_power) for
    /// lead/lag.
    pub fn sampled_power(&self, apparent_va: f64) -> SampledPower {
        let active_w = self.average_power();
        SampledPower {
            active_w,
            reactive_var_magnitude: reactive_magnitude(apparent_va, active_w),
        }
    }
}
