use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

use super::quadrant::QuadrantLabel;

// ============================================================================
// Power
// ============================================================================

/// Power quantities of a single phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerResult {
    /// Active power (W)
    pub active_w: f64,
    /// Reactive power (VAR, positive = lagging)
    pub reactive_var: f64,
    /// Apparent power (VA)
    pub apparent_va: f64,
    pub quadrant: QuadrantLabel,
}

impl PowerResult {
    /// cos φ as P/S, clamped to [-1, 1]. Zero when there is no apparent power.
    pub fn power_factor(&self) -> f64 {
        if self.apparent_va == 0.0 {
            return 0.0;
        }
        (self.active_w / self.apparent_va).clamp(-1.0, 1.0)
    }

    pub fn active_kw(&self) -> f64 {
        self.active_w / 1000.0
    }

    pub fn reactive_kvar(&self) -> f64 {
        self.reactive_var / 1000.0
    }

    pub fn apparent_kva(&self) -> f64 {
        self.apparent_va / 1000.0
    }

    /// Drop the quadrant, keeping the summable quantities
    pub fn totals(&self) -> PowerTotals {
        PowerTotals {
            active_w: self.active_w,
            reactive_var: self.reactive_var,
            apparent_va: self.apparent_va,
        }
    }
}

impl fmt::Display for PowerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} kW, {:.3} kVAR, {:.3} kVA ({})",
            self.active_kw(),
            self.reactive_kvar(),
            self.apparent_kva(),
            self.quadrant.description()
        )
    }
}

/// Summed power of several phases.
///
/// `apparent_va` is the arithmetic sum of per-phase apparent power.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerTotals {
    pub active_w: f64,
    pub reactive_var: f64,
    pub apparent_va: f64,
}

impl PowerTotals {
    /// Magnitude of the complex sum P + jQ (VA)
    pub fn vector_apparent_va(&self) -> f64 {
        self.active_w.hypot(self.reactive_var)
    }
}

impl Add for PowerTotals {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            active_w: self.active_w + rhs.active_w,
            reactive_var: self.reactive_var + rhs.reactive_var,
            apparent_va: self.apparent_va + rhs.apparent_va,
        }
    }
}

impl std::iter::Sum for PowerTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

// ============================================================================
// Energy
// ============================================================================

/// Energy accumulated over an interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyResult {
    pub kwh: f64,
    pub kvah: f64,
    /// Signed reactive energy (positive = lagging)
    pub kvarh: f64,
}

/// Reactive energy registers as kept by four-quadrant meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReactiveEnergySplit {
    pub lagging_kvarh: f64,
    pub leading_kvarh: f64,
}

impl EnergyResult {
    /// Split signed kVARh into lagging and leading registers
    pub fn split_reactive(&self) -> ReactiveEnergySplit {
        if self.kvarh >= 0.0 {
            ReactiveEnergySplit {
                lagging_kvarh: self.kvarh,
                leading_kvarh: 0.0,
            }
        } else {
            ReactiveEnergySplit {
                lagging_kvarh: 0.0,
                leading_kvarh: -self.kvarh,
            }
        }
    }
}

impl fmt::Display for EnergyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} kWh, {:.3} kVAh, {:.3} kVARh",
            self.kwh, self.kvah, self.kvarh
        )
    }
}

impl Add for EnergyResult {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            kwh: self.kwh + rhs.kwh,
            kvah: self.kvah + rhs.kvah,
            kvarh: self.kvarh + rhs.kvarh,
        }
    }
}

impl Mul<f64> for EnergyResult {
    type Output = Self;
    fn mul(self, factor: f64) -> Self::Output {
        Self {
            kwh: self.kwh * factor,
            kvah: self.kvah * factor,
            kvarh: self.kvarh * factor,
        }
    }
}

impl std::iter::Sum for EnergyResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

// ============================================================================
// Waveforms
// ============================================================================

/// Sampled voltage, current and instantaneous power, index-aligned to `time_seconds`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Waveform {
    pub time_seconds: Vec<f64>,
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
    pub instantaneous_power: Vec<f64>,
}

/// Power estimated from samples rather than from the closed form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampledPower {
    pub active_w: f64,
    /// |Q| from sqrt(S² - P²); carries no lead/lag sign
    pub reactive_var_magnitude: f64,
}

impl Waveform {
    pub fn len(&self) -> usize {
        self.time_seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_seconds.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        match (self.time_seconds.first(), self.time_seconds.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Time-average of instantaneous power using the trapezoid rule.
    ///
    /// Falls back to the plain mean when the waveform spans no time.
    pub fn average_power(&self) -> f64 {
        let duration = self.duration_seconds();
        if duration <= 0.0 {
            if self.instantaneous_power.is_empty() {
                return 0.0;
            }
            return self.instantaneous_power.iter().sum::<f64>()
                / self.instantaneous_power.len() as f64;
        }

        let area: f64 = self
            .time_seconds
            .windows(2)
            .zip(self.instantaneous_power.windows(2))
            .map(|(t, p)| (t[1] - t[0]) * (p[0] + p[1]) / 2.0)
            .sum();
        area / duration
    }

    /// Peak absolute value of the voltage trace
    pub fn voltage_peak(&self) -> f64 {
        self.voltage.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Peak absolute value of the current trace
    pub fn current_peak(&self) -> f64 {
        self.current.iter().fold(0.0_f64, |acc, i| acc.max(i.abs()))
    }
}

// ============================================================================
// Phasors
// ============================================================================

/// End point of a vector drawn from the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phasor {
    pub magnitude: f64,
    pub angle_deg: f64,
    pub x: f64,
    pub y: f64,
}

/// Voltage and current vectors of one phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasorPair {
    pub voltage: Phasor,
    pub current: Phasor,
}

impl PhasorPair {
    /// Largest magnitude of the pair, for axis scaling
    pub fn extent(&self) -> f64 {
        self.voltage.magnitude.max(self.current.magnitude)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
