use serde::{Deserialize, Serialize};

use crate::advisory::criterion::Tolerance;
use crate::advisory::observation::ObservationField;

/// Point weights for crop suitability scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub soil_points: u16,
    pub ph_points: u16,
    pub rainfall_points: u16,
    pub temperature_points: u16,
    pub near_miss_points: u16,
    pub drought_bonus: u16,
    pub inclusion_floor: u16,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            soil_points: 3,
            ph_points: 2,
            rainfall_points: 2,
            temperature_points: 2,
            near_miss_points: 1,
            drought_bonus: 2,
            inclusion_floor: 3,
        }
    }
}

impl ScoringConfig {
    /// Points for an exact match on `field`, `None` when the field is not scored.
    pub fn full_points(&self, field: ObservationField) -> Option<u16> {
        match field {
            ObservationField::SoilType => Some(self.soil_points),
            ObservationField::Ph => Some(self.ph_points),
            ObservationField::Rainfall => Some(self.rainfall_points),
            ObservationField::Temperature => Some(self.temperature_points),
            _ => None,
        }
    }
}

/// Near-miss bands applied to crop range criteria.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceBands {
    /// pH units either side of the range.
    pub ph: f64,
    /// Fraction of the nearest rainfall bound.
    pub rainfall_ratio: f64,
    /// Degrees Celsius either side of the range.
    pub temperature: f64,
}

impl Default for ToleranceBands {
    fn default() -> Self {
        Self {
            ph: 0.5,
            rainfall_ratio: 0.2,
            temperature: 2.0,
        }
    }
}

impl ToleranceBands {
    pub fn ph_band(&self) -> Tolerance {
        Tolerance::Absolute(self.ph)
    }

    pub fn rainfall_band(&self) -> Tolerance {
        Tolerance::Relative(self.rainfall_ratio)
    }

    pub fn temperature_band(&self) -> Tolerance {
        Tolerance::Absolute(self.temperature)
    }
}
