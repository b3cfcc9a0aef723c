//! Parsed ingredient clauses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Measurement unit recognized in a meal description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Grams
    #[default]
    #[serde(rename = "g")]
    Grams,
    /// Millilitres
    #[serde(rename = "ml")]
    Millilitres,
    /// Counted units (uds, unidad, unidades)
    #[serde(rename = "uds")]
    Units,
    /// Tablespoon (cucharada)
    #[serde(rename = "cucharada")]
    Tablespoon,
    /// Teaspoon (cucharadita)
    #[serde(rename = "cucharadita")]
    Teaspoon,
    /// Anything else
    Unspecified,
}

impl Unit {
    /// Map a unit token to a unit.
    ///
    /// Case-insensitive; plural forms are accepted. Unknown tokens map to
    /// [`Unit::Unspecified`].
    pub fn from_token(token: &str) -> Self {
        let lower = token.trim().to_lowercase();
        match lower.as_str() {
            "g" | "gr" | "grs" | "gramo" | "gramos" => Unit::Grams,
            "ml" => Unit::Millilitres,
            t if t.starts_with("cucharadita") => Unit::Teaspoon,
            t if t.starts_with("cucharada") => Unit::Tablespoon,
            t if t.starts_with("ud") || t.starts_with("unidad") => Unit::Units,
            _ => Unit::Unspecified,
        }
    }

    /// Short label used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Millilitres => "ml",
            Unit::Units => "uds",
            Unit::Tablespoon => "cucharada",
            Unit::Teaspoon => "cucharadita",
            Unit::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One comma-separated ingredient mention of a meal description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientClause {
    /// Segment text as it appeared in the description (trimmed)
    pub raw_text: String,
    /// Quantity, 1 when absent
    pub quantity: f64,
    /// Unit, grams when absent
    pub unit: Unit,
    /// Ingredient name, lower-cased and trimmed
    pub ingredient_name: String,
}

impl IngredientClause {
    /// Clause for a segment with no recognizable quantity.
    pub fn unparsed(segment: &str) -> Self {
        let raw_text = segment.trim().to_string();
        Self {
            ingredient_name: raw_text.to_lowercase(),
            raw_text,
            quantity: 1.0,
            unit: Unit::Grams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tokens() {
        assert_eq!(Unit::from_token("g"), Unit::Grams);
        assert_eq!(Unit::from_token("G"), Unit::Grams);
        assert_eq!(Unit::from_token("ml"), Unit::Millilitres);
        assert_eq!(Unit::from_token("ML"), Unit::Millilitres);
        assert_eq!(Unit::from_token("ud"), Unit::Units);
        assert_eq!(Unit::from_token("uds"), Unit::Units);
        assert_eq!(Unit::from_token("unidad"), Unit::Units);
        assert_eq!(Unit::from_token("unidades"), Unit::Units);
        assert_eq!(Unit::from_token("cucharada"), Unit::Tablespoon);
        assert_eq!(Unit::from_token("cucharadas"), Unit::Tablespoon);
        assert_eq!(Unit::from_token("cucharadita"), Unit::Teaspoon);
        assert_eq!(Unit::from_token("cucharaditas"), Unit::Teaspoon);
        assert_eq!(Unit::from_token("taza"), Unit::Unspecified);
    }

    #[test]
    fn test_unit_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Unit::Grams).unwrap(), "\"g\"");
        assert_eq!(serde_json::to_string(&Unit::Units).unwrap(), "\"uds\"");
        assert_eq!(
            serde_json::to_string(&Unit::Unspecified).unwrap(),
            "\"unspecified\""
        );
    }

    #[test]
    fn test_unparsed_clause() {
        let clause = IngredientClause::unparsed("  Sal al gusto ");
        assert_eq!(clause.raw_text, "Sal al gusto");
        assert_eq!(clause.ingredient_name, "sal al gusto");
        assert_eq!(clause.quantity, 1.0);
        assert_eq!(clause.unit, Unit::Grams);
    }
}
