//! Power quadrant classification.
//!
//! Angles are the amount by which current lags voltage, in degrees:
//!
//! | Range          | Quadrant | Label          |
//! |----------------|----------|----------------|
//! | `[0, 90]`      | I        | InductiveLoad  |
//! | `(90, 180]`    | II       | GeneratorLag   |
//! | `[-180, -90)`  | III      | GeneratorLead  |
//! | `[-90, 0)`     | IV       | CapacitiveLoad |
//!
//! Everything outside `[-180, 180]` (and NaN) is `Unknown`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuadrantLabel {
    InductiveLoad,
    GeneratorLag,
    GeneratorLead,
    CapacitiveLoad,
    Unknown,
}

impl QuadrantLabel {
    /// Classify a phase angle. Total: never fails, falls back to `Unknown`.
    pub fn classify(angle_deg: f64) -> Self {
        if (0.0..=90.0).contains(&angle_deg) {
            Self::InductiveLoad
        } else if angle_deg > 90.0 && angle_deg <= 180.0 {
            Self::GeneratorLag
        } else if (-180.0..-90.0).contains(&angle_deg) {
            Self::GeneratorLead
        } else if (-90.0..0.0).contains(&angle_deg) {
            Self::CapacitiveLoad
        } else {
            Self::Unknown
        }
    }

    /// Quadrant number (1..=4), `None` for `Unknown`
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::InductiveLoad => Some(1),
            Self::GeneratorLag => Some(2),
            Self::GeneratorLead => Some(3),
            Self::CapacitiveLoad => Some(4),
            Self::Unknown => None,
        }
    }

    /// Whether active power flows from the source into the load
    pub fn is_import(&self) -> bool {
        matches!(self, Self::InductiveLoad | Self::CapacitiveLoad)
    }

    /// Human readable description, e.g. "Quadrant II (Generator - lag)"
    pub fn description(&self) -> &'static str {
        match self {
            Self::InductiveLoad => "Quadrant I (Inductive Load)",
            Self::GeneratorLag => "Quadrant II (Generator - lag)",
            Self::GeneratorLead => "Quadrant III (Generator - lead)",
            Self::CapacitiveLoad => "Quadrant IV (Capacitive Load)",
            Self::Unknown => "Unknown",
        }
    }
}

/// Free-function form of [`QuadrantLabel::classify`].
pub fn classify_quadrant(angle_deg: f64) -> QuadrantLabel {
    QuadrantLabel::classify(angle_deg)
}
