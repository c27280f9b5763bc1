//! Plant sizing and timing parameters.

use crate::error::{PlantError, PlantResult};
use serde::{Deserialize, Serialize};

/// Everything configurable about the plant geometry and batch cycle.
/// Defaults reproduce the canonical installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantConfig {
    /// Capacity of each base-color source tank (liters).
    pub base_tank_capacity_liters: f64,
    /// Initial fill of each base-color source tank (liters).
    pub base_tank_initial_liters: f64,
    /// Capacity of the shared mixing tank (liters).
    pub mixer_tank_capacity_liters: f64,
    /// Total liters a recipe must deliver per batch.
    pub batch_size_liters: f64,
    /// Agitator run time per batch (seconds).
    pub mixing_time_s: f64,
    /// Drain rate as a fraction of mixer capacity per second.
    pub drain_fraction_per_s: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            base_tank_capacity_liters: 1000.0,
            base_tank_initial_liters: 250.0,
            mixer_tank_capacity_liters: 200.0,
            batch_size_liters: 150.0,
            mixing_time_s: 30.0,
            drain_fraction_per_s: 0.04,
        }
    }
}

impl PlantConfig {
    pub fn validate(&self) -> PlantResult<()> {
        let positives = [
            (self.base_tank_capacity_liters, "base tank capacity must be positive and finite"),
            (self.mixer_tank_capacity_liters, "mixer tank capacity must be positive and finite"),
            (self.batch_size_liters, "batch size must be positive and finite"),
            (self.mixing_time_s, "mixing time must be positive and finite"),
            (self.drain_fraction_per_s, "drain fraction must be positive and finite"),
        ];
        for (value, what) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlantError::InvalidArg { what });
            }
        }
        if !self.base_tank_initial_liters.is_finite() || self.base_tank_initial_liters < 0.0 {
            return Err(PlantError::InvalidArg {
                what: "base tank initial level must be non-negative and finite",
            });
        }
        if self.batch_size_liters > self.mixer_tank_capacity_liters {
            return Err(PlantError::InvalidArg {
                what: "batch size must not exceed mixer tank capacity",
            });
        }
        Ok(())
    }
}
