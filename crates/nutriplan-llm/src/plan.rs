//! Nutrition plan documents as produced by the plan generator.
//!
//! Field names on the wire follow the generator's Spanish keys. Anything
//! the models do not name is kept in `extra` so a plan survives a
//! read-modify-write cycle untouched.

use std::collections::BTreeMap;

use nutriplan_core::models::macro_value;
use nutriplan_core::{Macros, RoundedMacros};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Minimum number of days a generated plan must cover.
pub const MIN_PLAN_DAYS: usize = 7;

/// One meal of a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meal {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "calorias", deserialize_with = "lenient_number")]
    pub calories: f64,
    #[serde(rename = "proteinas", deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(rename = "carbohidratos", deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(rename = "grasas", deserialize_with = "lenient_number")]
    pub fat: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meal {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
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

    /// Overwrite the macro fields with whole numbers.
    pub fn set_macros(&mut self, macros: RoundedMacros) {
        self.calories = macros.calories as f64;
        self.protein = macros.protein as f64;
        self.carbs = macros.carbs as f64;
        self.fat = macros.fat as f64;
    }
}

/// A single day of the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Day {
    #[serde(rename = "dia", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "desayuno", skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<Meal>,
    #[serde(rename = "almuerzo", skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Meal>,
    #[serde(rename = "cena", skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Meal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snacks: Vec<Meal>,
    #[serde(rename = "comidas", skip_serializing_if = "Vec::is_empty")]
    pub meals: Vec<Meal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Day {
    pub fn meals(&self) -> impl Iterator<Item = &Meal> {
        self.breakfast
            .iter()
            .chain(self.lunch.iter())
            .chain(self.dinner.iter())
            .chain(self.snacks.iter())
            .chain(self.meals.iter())
    }

    pub fn meals_mut(&mut self) -> impl Iterator<Item = &mut Meal> {
        self.breakfast
            .iter_mut()
            .chain(self.lunch.iter_mut())
            .chain(self.dinner.iter_mut())
            .chain(self.snacks.iter_mut())
            .chain(self.meals.iter_mut())
    }

    /// Sum of the macros of every meal in the day.
    pub fn totals(&self) -> Macros {
        self.meals().map(Meal::macros).fold(Macros::default(), |acc, m| acc + m)
    }
}

/// Daily macro targets reported at the top of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanMacros {
    #[serde(rename = "calorias", deserialize_with = "lenient_number")]
    pub calories: f64,
    #[serde(rename = "proteinas", deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(rename = "carbohidratos", deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(rename = "grasas", deserialize_with = "lenient_number")]
    pub fat: f64,
}

impl From<RoundedMacros> for PlanMacros {
    fn from(m: RoundedMacros) -> Self {
        Self {
            calories: m.calories as f64,
            protein: m.protein as f64,
            carbs: m.carbs as f64,
            fat: m.fat as f64,
        }
    }
}

/// A weekly nutrition plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionPlan {
    #[serde(rename = "dias")]
    pub days: Vec<Day>,
    #[serde(rename = "listaCompra")]
    pub shopping_list: BTreeMap<String, Vec<String>>,
    #[serde(rename = "macronutrientes", skip_serializing_if = "Option::is_none")]
    pub macros: Option<PlanMacros>,
    #[serde(rename = "restricciones")]
    pub restrictions: Vec<String>,
    #[serde(rename = "objetivo", skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(rename = "numeroComidas", skip_serializing_if = "Option::is_none")]
    pub meals_per_day: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NutritionPlan {
    pub fn meal_count(&self) -> usize {
        self.days.iter().map(|d| d.meals().count()).sum()
    }

    /// Average daily macros across every day of the plan.
    ///
    /// Returns `None` for a plan without days.
    pub fn daily_average(&self) -> Option<Macros> {
        if self.days.is_empty() {
            return None;
        }
        let total = self
            .days
            .iter()
            .map(Day::totals)
            .fold(Macros::default(), |acc, m| acc + m);
        Some(total.scaled(1.0 / self.days.len() as f64))
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(macro_value(Some(&value)))
}
