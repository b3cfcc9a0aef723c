//! Diet-filter overlay and restriction validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::FoodRecord;

/// Restriction selection errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestrictionError {
    #[error("{message}")]
    Incompatible {
        group: &'static str,
        selected: Vec<String>,
        message: &'static str,
    },
}

pub type RestrictionResult<T> = Result<T, RestrictionError>;

/// Diet and restriction context used to narrow candidate records.
///
/// A diet keeps records tagged as suitable for it. Each restriction drops
/// records whose name or description mentions it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietFilter {
    pub diet: Option<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
}

impl DietFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    pub fn with_restrictions<I, S>(mut self, restrictions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restrictions.extend(restrictions.into_iter().map(Into::into));
        self
    }

    /// True when the filter narrows nothing.
    pub fn is_empty(&self) -> bool {
        self.diet().is_none() && self.restriction_terms().next().is_none()
    }

    /// Check a single record.
    pub fn accepts(&self, food: &FoodRecord) -> bool {
        if let Some(diet) = self.diet() {
            if !food.is_suitable_for(diet) {
                return false;
            }
        }
        self.restriction_terms().all(|term| !food.mentions(&term))
    }

    /// Records compatible with this filter, in dataset order.
    pub fn apply<'c>(&self, foods: &'c [FoodRecord]) -> Vec<&'c FoodRecord> {
        foods.iter().filter(|f| self.accepts(f)).collect()
    }

    fn diet(&self) -> Option<&str> {
        self.diet.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }

    fn restriction_terms(&self) -> impl Iterator<Item = String> + '_ {
        self.restrictions
            .iter()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
    }
}

/// A set of restrictions that cannot be selected together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionGroup {
    pub name: &'static str,
    pub restrictions: &'static [&'static str],
    pub message: &'static str,
}

/// Mutually incompatible diet selections.
pub const INCOMPATIBLE_GROUPS: &[RestrictionGroup] = &[
    RestrictionGroup {
        name: "Dietas vegetarianas",
        restrictions: &["Vegetariano", "Vegano"],
        message: "No puedes seleccionar Vegetariano y Vegano al mismo tiempo. El veganismo es una forma más estricta de vegetarianismo.",
    },
    RestrictionGroup {
        name: "Dietas específicas",
        restrictions: &["Dieta mediterránea", "Dieta keto", "Low carb"],
        message: "No puedes seleccionar Dieta mediterránea junto con Dieta keto o Low carb, ya que son enfoques dietéticos diferentes.",
    },
    RestrictionGroup {
        name: "Dietas y veganismo",
        restrictions: &["Dieta mediterránea", "Vegano"],
        message: "La dieta mediterránea incluye productos de origen animal, por lo que no es compatible con el veganismo.",
    },
    RestrictionGroup {
        name: "Dietas y vegetarianismo",
        restrictions: &["Dieta keto", "Vegetariano"],
        message: "La dieta keto es alta en proteínas animales, por lo que es difícil de seguir siendo vegetariano.",
    },
];

/// Reject selections containing two members of the same incompatible group.
///
/// Labels compare trimmed and case-insensitively. The first violated group
/// is reported.
pub fn validate_restrictions<S: AsRef<str>>(selected: &[S]) -> RestrictionResult<()> {
    let selected: Vec<String> = selected
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .collect();

    for group in INCOMPATIBLE_GROUPS {
        let in_group: Vec<String> = group
            .restrictions
            .iter()
            .filter(|r| selected.contains(&r.to_lowercase()))
            .map(|r| r.to_string())
            .collect();
        if in_group.len() > 1 {
            return Err(RestrictionError::Incompatible {
                group: group.name,
                selected: in_group,
                message: group.message,
            });
        }
    }
    Ok(())
}
