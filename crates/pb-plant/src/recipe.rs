//! Base colors and paint recipes.

use crate::error::{PlantError, PlantResult};
use core::fmt;
use pb_core::numeric::EPSILON_LITERS;
use serde::{Deserialize, Serialize};

/// The three unmixed source liquids. Declaration order is the pumping
/// priority order, and the derived `Ord` keys the plant's line map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseColor {
    White,
    Blue,
    Black,
}

impl BaseColor {
    /// Pumping priority order.
    pub const ALL: [BaseColor; 3] = [BaseColor::White, BaseColor::Blue, BaseColor::Black];

    /// Position in [`BaseColor::ALL`]; used to index per-line storage.
    pub fn index(self) -> usize {
        self as usize
    }

    /// P&ID loop number for this line's equipment tags.
    pub fn tag_number(self) -> u16 {
        match self {
            BaseColor::White => 201,
            BaseColor::Blue => 202,
            BaseColor::Black => 203,
        }
    }
}

impl fmt::Display for BaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseColor::White => write!(f, "WHITE"),
            BaseColor::Blue => write!(f, "BLUE"),
            BaseColor::Black => write!(f, "BLACK"),
        }
    }
}

/// Per-batch liters of each base color for one target paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    name: String,
    white_liters: f64,
    blue_liters: f64,
    black_liters: f64,
}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        white_liters: f64,
        blue_liters: f64,
        black_liters: f64,
    ) -> PlantResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(PlantError::InvalidArg {
                what: "recipe name must not be empty",
            });
        }
        for liters in [white_liters, blue_liters, black_liters] {
            if !liters.is_finite() || liters < 0.0 {
                return Err(PlantError::InvalidArg {
                    what: "recipe liters must be finite and non-negative",
                });
            }
        }
        Ok(Self {
            name,
            white_liters,
            blue_liters,
            black_liters,
        })
    }

    /// Sky blue: equal parts white and blue.
    pub fn celeste() -> Self {
        Self {
            name: "CELESTE".into(),
            white_liters: 75.0,
            blue_liters: 75.0,
            black_liters: 0.0,
        }
    }

    /// Navy blue: two parts black to one part blue.
    pub fn navy() -> Self {
        Self {
            name: "NAVY".into(),
            white_liters: 0.0,
            blue_liters: 50.0,
            black_liters: 100.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn liters_for(&self, color: BaseColor) -> f64 {
        match color {
            BaseColor::White => self.white_liters,
            BaseColor::Blue => self.blue_liters,
            BaseColor::Black => self.black_liters,
        }
    }

    pub fn total_liters(&self) -> f64 {
        self.white_liters + self.blue_liters + self.black_liters
    }

    /// Recipe totals must account for the whole batch.
    pub fn matches_batch_size(&self, batch_size_liters: f64) -> bool {
        (self.total_liters() - batch_size_liters).abs() <= EPSILON_LITERS
    }
}
