//! Macro-nutrient values, per-clause contributions and totals.

use std::collections::HashSet;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::{FoodRecord, IngredientClause, Unit};

/// The four tracked macro values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    /// Multiply every value by `factor`, replacing non-finite results with 0.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
        .finite_or_zero()
    }

    /// Replace each non-finite value with 0.
    pub fn finite_or_zero(self) -> Self {
        Self {
            calories: finite_or_zero(self.calories),
            protein: finite_or_zero(self.protein),
            carbs: finite_or_zero(self.carbs),
            fat: finite_or_zero(self.fat),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.calories == 0.0 && self.protein == 0.0 && self.carbs == 0.0 && self.fat == 0.0
    }

    /// Round each value to the nearest integer (halves away from zero).
    pub fn rounded(&self) -> RoundedMacros {
        RoundedMacros {
            calories: round_macro(self.calories),
            protein: round_macro(self.protein),
            carbs: round_macro(self.carbs),
            fat: round_macro(self.fat),
        }
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

/// Integer macro values written back into meals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundedMacros {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

/// Result of resolving one clause.
///
/// When `matched_food` is `None` all four macro values are exactly 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MacroContribution {
    pub ingredient: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_food: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroContribution {
    /// Contribution of a clause matched to `food`, already scaled.
    pub fn matched(clause: &IngredientClause, food: &FoodRecord, macros: Macros) -> Self {
        let macros = macros.finite_or_zero();
        Self {
            ingredient: clause.ingredient_name.clone(),
            quantity: clause.quantity,
            unit: clause.unit,
            matched_food: Some(food.name.clone()),
            calories: macros.calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
        }
    }

    /// Zero contribution of a clause with no reference record.
    pub fn unmatched(clause: &IngredientClause) -> Self {
        Self {
            ingredient: clause.ingredient_name.clone(),
            quantity: clause.quantity,
            unit: clause.unit,
            matched_food: None,
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched_food.is_some()
    }

    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

/// Aggregate across all clauses of one description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTotal {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// One entry per clause, in description order
    pub details: Vec<MacroContribution>,
    /// Ingredient names with no resolved record, de-duplicated
    pub unmatched: Vec<String>,
}

impl MacroTotal {
    /// Sum contributions into a total.
    ///
    /// Totals are checked for finiteness after summation and `unmatched`
    /// is de-duplicated by trimmed, case-insensitive value (first spelling
    /// wins).
    pub fn from_contributions(details: Vec<MacroContribution>) -> Self {
        let mut sum = Macros::default();
        let mut unmatched = Vec::new();
        let mut seen = HashSet::new();

        for detail in &details {
            sum += detail.macros().finite_or_zero();
            if !detail.is_matched() {
                let key = detail.ingredient.trim().to_lowercase();
                if seen.insert(key) {
                    unmatched.push(detail.ingredient.trim().to_string());
                }
            }
        }

        let sum = sum.finite_or_zero();
        Self {
            calories: sum.calories,
            protein: sum.protein,
            carbs: sum.carbs,
            fat: sum.fat,
            details,
            unmatched,
        }
    }

    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }

    /// Integer totals for the call boundary.
    pub fn rounded(&self) -> RoundedMacros {
        self.macros().rounded()
    }

    pub fn is_zero(&self) -> bool {
        self.macros().is_zero()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn round_macro(value: f64) -> i64 {
    finite_or_zero(value).round() as i64
}
