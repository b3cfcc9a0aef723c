//! Reference food records.

use serde::{Deserialize, Serialize};

use super::Macros;

/// A single item in the reference nutrition database.
///
/// Macro densities are expressed per 100 reference units (grams or
/// millilitres). They are normalized once at construction: anything
/// negative or non-finite is stored as 0.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodRecord {
    /// Canonical name as it appears in the dataset
    pub name: String,
    /// kcal per 100 g/ml
    pub calories_per_100: f64,
    /// Protein grams per 100 g/ml
    pub protein_per_100: f64,
    /// Carbohydrate grams per 100 g/ml
    pub carbs_per_100: f64,
    /// Fat grams per 100 g/ml
    pub fat_per_100: f64,
    /// Free-text description, used by restriction filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Diet labels this food is suitable for (e.g. "vegana", "keto")
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suitable_for: Vec<String>,
    #[serde(skip)]
    key: String,
}

impl FoodRecord {
    /// Create a record, coercing invalid macro values to 0.
    pub fn new(name: impl Into<String>, calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        let name = name.into();
        let key = name.to_lowercase();
        Self {
            name,
            calories_per_100: sanitize_macro(calories),
            protein_per_100: sanitize_macro(protein),
            carbs_per_100: sanitize_macro(carbs),
            fat_per_100: sanitize_macro(fat),
            description: None,
            suitable_for: Vec::new(),
            key,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach diet suitability labels.
    pub fn with_suitable_for<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suitable_for = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Lower-cased name used for matching.
    pub fn search_key(&self) -> &str {
        &self.key
    }

    /// Macro densities per 100 reference units.
    pub fn macros_per_100(&self) -> Macros {
        Macros {
            calories: self.calories_per_100,
            protein: self.protein_per_100,
            carbs: self.carbs_per_100,
            fat: self.fat_per_100,
        }
    }

    /// Check whether this food is tagged as suitable for a diet.
    pub fn is_suitable_for(&self, diet: &str) -> bool {
        let diet = diet.trim().to_lowercase();
        self.suitable_for
            .iter()
            .any(|label| label.trim().to_lowercase() == diet)
    }

    /// Check whether the name or description mentions a term (lower-cased).
    pub fn mentions(&self, term: &str) -> bool {
        if self.key.contains(term) {
            return true;
        }
        self.description
            .as_deref()
            .map(|d| d.to_lowercase().contains(term))
            .unwrap_or(false)
    }
}

/// Food record exactly as stored in the dataset files.
///
/// Macro fields stay untyped here; the dataset is hand-curated and carries
/// numbers, numeric strings, nulls and the occasional placeholder text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFoodRecord {
    #[serde(default, rename = "nombre", alias = "name")]
    pub name: Option<serde_json::Value>,
    #[serde(default, rename = "calorias", alias = "calories")]
    pub calories: Option<serde_json::Value>,
    #[serde(default, rename = "proteinas", alias = "protein")]
    pub protein: Option<serde_json::Value>,
    #[serde(default, rename = "carbohidratos", alias = "carbs")]
    pub carbs: Option<serde_json::Value>,
    #[serde(default, rename = "grasas", alias = "fat")]
    pub fat: Option<serde_json::Value>,
    #[serde(default, rename = "descripcion", alias = "description")]
    pub description: Option<serde_json::Value>,
    #[serde(default, rename = "aptoPara", alias = "suitableFor")]
    pub suitable_for: Option<serde_json::Value>,
}

/// Why a raw record was rejected during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    /// Missing, blank or non-string name
    MissingName,
}

impl TryFrom<RawFoodRecord> for FoodRecord {
    type Error = RecordRejection;

    fn try_from(raw: RawFoodRecord) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(RecordRejection::MissingName)?;

        let mut record = FoodRecord::new(
            name,
            macro_value(raw.calories.as_ref()),
            macro_value(raw.protein.as_ref()),
            macro_value(raw.carbs.as_ref()),
            macro_value(raw.fat.as_ref()),
        );

        record.description = raw
            .description
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::to_string);

        record.suitable_for = match raw.suitable_for {
            Some(serde_json::Value::Array(labels)) => labels
                .iter()
                .filter_map(|l| l.as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Ok(record)
    }
}

/// Read a macro density from an untyped JSON value.
///
/// Numbers and numeric strings are accepted; everything else reads as 0.
pub fn macro_value(value: Option<&serde_json::Value>) -> f64 {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    sanitize_macro(parsed.unwrap_or(0.0))
}

/// Coerce a macro density to a finite non-negative number.
pub fn sanitize_macro(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
