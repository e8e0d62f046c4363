//! Single-phase power from RMS magnitudes and phase angle.
//!
//! Uses the closed form P = S·cos θ, Q = S·sin θ with θ the angle by which
//! current lags voltage, so Q keeps its lead/lag sign.

use crate::domain::{PhaseMeasurement, PowerResult, QuadrantLabel};

use crate::error::{EngineError, Result};

/// `(sin, cos)` of an angle in degrees, exact at multiples of 90°.
///
/// `180f64.to_radians().sin()` is ~1.2e-16, not 0.
pub fn sin_cos_deg(angle_deg: f64) -> (f64, f64) {
    if angle_deg == 0.0 {
        (0.0, 1.0)
    } else if angle_deg == 90.0 {
        (1.0, 0.0)
    } else if angle_deg == -90.0 {
        (-1.0, 0.0)
    } else if angle_deg == 180.0 || angle_deg == -180.0 {
        (0.0, -1.0)
    } else {
        angle_deg.to_radians().sin_cos()
    }
}

/// Active, reactive and apparent power of one phase
pub fn compute_power(m: &PhaseMeasurement) -> Result<PowerResult> {
    m.validate()?;

    let apparent_va = m.voltage_rms * m.current_rms;
    if !apparent_va.is_finite() {
        return Err(EngineError::invalid(
            "apparent_va",
            apparent_va,
            "must be finite",
        ));
    }
    let (sin, cos) = sin_cos_deg(m.angle_deg);

    Ok(PowerResult {
        active_w: apparent_va * cos,
        reactive_var: apparent_va * sin,
        apparent_va,
        quadrant: QuadrantLabel::classify(m.angle_deg),
    })
}

/// |Q| recovered from S and P as sqrt(S² - P²).
///
/// Rounding can make S² - P² slightly negative; it is floored at zero.
pub fn reactive_magnitude(apparent_va: f64, active_w: f64) -> f64 {
    (apparent_va * apparent_va - active_w * active_w)
        .max(0.0)
        .sqrt()
}
