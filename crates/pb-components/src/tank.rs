//! Bounded liquid reservoir with an owned level transmitter.

use crate::error::{ComponentError, ComponentResult};
use crate::sensor::{Sensor, SensorKind};
use core::fmt;
use pb_core::numeric::{EPSILON_LITERS, ensure_finite};
use serde::{Deserialize, Serialize};

/// Fraction of capacity below which a non-empty tank reads LOW.
pub const LOW_LEVEL_FRACTION: f64 = 0.05;

/// Derived level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    /// Exactly zero.
    Empty,
    /// Strictly below 5% of capacity.
    Low,
    /// Everything else; exactly 5.0% is Normal, not Low.
    Normal,
}

impl fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelStatus::Empty => write!(f, "EMPTY"),
            LevelStatus::Low => write!(f, "LOW"),
            LevelStatus::Normal => write!(f, "NORMAL"),
        }
    }
}

/// A tank clamps its level into `[0, capacity]` on every mutation and keeps
/// its level transmitter in sync. Negative add/remove amounts are ignored.
#[derive(Debug, Clone)]
pub struct Tank {
    name: String,
    capacity_liters: f64,
    level_liters: f64,
    level_tx: Sensor,
}

impl Tank {
    /// Create a tank. Capacity must be positive and finite; the initial
    /// level is clamped into `[0, capacity]`.
    pub fn new(
        name: impl Into<String>,
        capacity_liters: f64,
        initial_level_liters: f64,
    ) -> ComponentResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "tank name must not be empty",
            });
        }
        ensure_finite(capacity_liters, "tank capacity")?;
        if capacity_liters <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "tank capacity must be positive",
            });
        }
        ensure_finite(initial_level_liters, "tank initial level")?;
        let level_tx = Sensor::new(format!("{name}_LT"), SensorKind::LevelTransmitter)?;
        let mut tank = Self {
            name,
            capacity_liters,
            level_liters: initial_level_liters.clamp(0.0, capacity_liters),
            level_tx,
        };
        tank.sync_transmitter();
        Ok(tank)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity_liters(&self) -> f64 {
        self.capacity_liters
    }

    pub fn level_liters(&self) -> f64 {
        self.level_liters
    }

    /// Remaining room before the tank overflows.
    pub fn free_space_liters(&self) -> f64 {
        self.capacity_liters - self.level_liters
    }

    pub fn level_percent(&self) -> f64 {
        // capacity is nonzero by construction
        self.level_liters / self.capacity_liters * 100.0
    }

    pub fn level_status(&self) -> LevelStatus {
        if self.level_liters == 0.0 {
            LevelStatus::Empty
        } else if self.level_liters / self.capacity_liters < LOW_LEVEL_FRACTION {
            LevelStatus::Low
        } else {
            LevelStatus::Normal
        }
    }

    pub fn level_transmitter(&self) -> &Sensor {
        &self.level_tx
    }

    /// Add liquid, clamping at capacity. Negative amounts are a no-op.
    pub fn add_liquid(&mut self, amount_liters: f64) {
        if !amount_liters.is_finite() || amount_liters < 0.0 {
            return;
        }
        self.level_liters = (self.level_liters + amount_liters).min(self.capacity_liters);
        self.sync_transmitter();
    }

    /// Remove liquid, clamping at zero. Negative amounts are a no-op.
    pub fn remove_liquid(&mut self, amount_liters: f64) {
        if !amount_liters.is_finite() || amount_liters < 0.0 {
            return;
        }
        self.level_liters = (self.level_liters - amount_liters).max(0.0);
        self.sync_transmitter();
    }

    /// True once the remaining liquid is below the shared liters epsilon.
    pub fn is_effectively_empty(&self) -> bool {
        self.level_liters <= EPSILON_LITERS
    }

    fn sync_transmitter(&mut self) {
        self.level_tx.force_level(self.level_liters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_validates_capacity() {
        assert!(Tank::new("T-201", 0.0, 0.0).is_err());
        assert!(Tank::new("T-201", -10.0, 0.0).is_err());
        assert!(Tank::new("T-201", f64::NAN, 0.0).is_err());
        assert!(Tank::new("", 100.0, 0.0).is_err());
        assert!(Tank::new("T-201", 100.0, 50.0).is_ok());
    }

    #[test]
    fn initial_level_clamped() {
        let tank = Tank::new("T-201", 100.0, 250.0).unwrap();
        assert_eq!(tank.level_liters(), 100.0);
        let tank = Tank::new("T-201", 100.0, -5.0).unwrap();
        assert_eq!(tank.level_liters(), 0.0);
    }

    #[test]
    fn add_remove_clamp_to_bounds() {
        let mut tank = Tank::new("T-201", 100.0, 90.0).unwrap();
        tank.add_liquid(50.0);
        assert_eq!(tank.level_liters(), 100.0);
        tank.remove_liquid(150.0);
        assert_eq!(tank.level_liters(), 0.0);
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut tank = Tank::new("T-201", 100.0, 40.0).unwrap();
        tank.add_liquid(-1.0);
        tank.remove_liquid(-1.0);
        assert_eq!(tank.level_liters(), 40.0);
    }

    #[test]
    fn transmitter_tracks_level() {
        let mut tank = Tank::new("T-201", 100.0, 40.0).unwrap();
        tank.remove_liquid(15.0);
        assert_eq!(tank.level_transmitter().level_liters().unwrap(), 25.0);
    }

    #[test]
    fn level_status_boundaries() {
        let mut tank = Tank::new("T-201", 1000.0, 0.0).unwrap();
        assert_eq!(tank.level_status(), LevelStatus::Empty);

        tank.add_liquid(49.9);
        assert_eq!(tank.level_status(), LevelStatus::Low);

        // Exactly 5.0% reads Normal, not Low.
        tank.add_liquid(0.1);
        assert_eq!(tank.level_liters(), 50.0);
        assert_eq!(tank.level_status(), LevelStatus::Normal);

        tank.add_liquid(500.0);
        assert_eq!(tank.level_status(), LevelStatus::Normal);
    }

    #[test]
    fn level_percent() {
        let tank = Tank::new("T-201", 200.0, 50.0).unwrap();
        assert_eq!(tank.level_percent(), 25.0);
    }
}
