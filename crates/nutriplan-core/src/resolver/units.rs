//! Unit conversion to the 100-unit reference basis.

use crate::config::{DEFAULT_GRAMS_PER_TABLESPOON, DEFAULT_GRAMS_PER_TEASPOON, ResolverConfig};
use crate::models::Unit;

/// Size of the basis that food macro densities are expressed against.
pub const REFERENCE_BASIS: f64 = 100.0;

/// Converts a (quantity, unit) pair into a factor over the reference basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    grams_per_tablespoon: f64,
    grams_per_teaspoon: f64,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitConverter {
    pub fn new() -> Self {
        Self {
            grams_per_tablespoon: DEFAULT_GRAMS_PER_TABLESPOON,
            grams_per_teaspoon: DEFAULT_GRAMS_PER_TEASPOON,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            grams_per_tablespoon: config.grams_per_tablespoon,
            grams_per_teaspoon: config.grams_per_teaspoon,
        }
    }

    /// Scale factor relative to a record's 100-unit basis.
    ///
    /// Counted units are one full reference portion each. Unknown units
    /// count as a single portion regardless of quantity. Quantities are not
    /// clamped.
    pub fn scale_factor(&self, quantity: f64, unit: Unit) -> f64 {
        match unit {
            Unit::Grams | Unit::Millilitres => quantity / REFERENCE_BASIS,
            Unit::Tablespoon => quantity * self.grams_per_tablespoon / REFERENCE_BASIS,
            Unit::Teaspoon => quantity * self.grams_per_teaspoon / REFERENCE_BASIS,
            Unit::Units => quantity,
            Unit::Unspecified => 1.0,
        }
    }
}

/// Scale factor with the default spoon weights.
pub fn scale_factor(quantity: f64, unit: Unit) -> f64 {
    UnitConverter::new().scale_factor(quantity, unit)
}
