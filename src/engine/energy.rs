use crate::domain::{EnergyResult, PowerResult};

use crate::error::{ensure_finite, ensure_non_negative, Result};

const WATTS_PER_KILOWATT: f64 = 1000.0;

/// Energy over `hours` at constant power
pub fn compute_energy(p: &PowerResult, hours: f64) -> Result<EnergyResult> {
    let hours = ensure_non_negative("hours", hours)?;
    // |P| and |Q| never exceed S, so a finite kVAh bounds the other two
    ensure_finite("kvah", p.apparent_va * hours / WATTS_PER_KILOWATT)?;

    Ok(EnergyResult {
        kwh: p.active_w * hours / WATTS_PER_KILOWATT,
        kvah: p.apparent_va * hours / WATTS_PER_KILOWATT,
        kvarh: p.reactive_var * hours / WATTS_PER_KILOWATT,
    })
}
