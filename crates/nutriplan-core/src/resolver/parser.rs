//! Ingredient clause parser.
//!
//! Grammar, per comma-separated segment:
//!
//! ```text
//! segment  := quantity [unit] [ "de" ] name
//! quantity := digits [ ("." | ",") digits ]
//! unit     := ( g | gr | gramos | ml | ud | uds | unidad | unidades
//!           | cucharada[s] | cucharadita[s] ) [ "." ]   (case-insensitive)
//! ```
//!
//! A unit token only counts when it ends at a word boundary, so
//! "100 gambas" reads as 100 g of "gambas" rather than 100 g of "ambas".
//! A bare count with no unit keeps the count as quantity with the default
//! unit: "1 plátano" is `{1, g, "plátano"}`. Segments with no leading
//! number, or with nothing left after the quantity, become a clause with
//! quantity 1, unit g and the whole segment as name.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{IngredientClause, Unit};

const CLAUSE_PATTERN: &str = r"(?i)^(\d+(?:[.,]\d+)?)\s*(?:(unidades|unidad|uds|ud|cucharaditas|cucharadita|cucharadas|cucharada|gramos|gramo|grs|gr|ml|g)\b\.?)?\s*(?:de\s+)?(.*)$";

fn clause_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(CLAUSE_PATTERN).expect("clause pattern is valid"))
}

/// Parser turning a meal description into ingredient clauses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseParser;

impl ClauseParser {
    pub fn new() -> Self {
        Self
    }

    /// Split a description into clauses, one per non-empty segment.
    pub fn parse_clauses(&self, description: &str) -> Vec<IngredientClause> {
        description
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| self.parse_segment(segment))
            .collect()
    }

    /// Parse one trimmed segment. Never fails.
    pub fn parse_segment(&self, segment: &str) -> IngredientClause {
        let Some(caps) = clause_pattern().captures(segment) else {
            return IngredientClause::unparsed(segment);
        };

        let quantity = match caps[1].replace(',', ".").parse::<f64>() {
            Ok(q) if q.is_finite() => q,
            _ => return IngredientClause::unparsed(segment),
        };

        let unit = caps
            .get(2)
            .map(|m| Unit::from_token(m.as_str()))
            .unwrap_or_default();

        let name = clean_name(caps.get(3).map(|m| m.as_str()).unwrap_or(""));
        if name.is_empty() {
            return IngredientClause::unparsed(segment);
        }

        IngredientClause {
            raw_text: segment.to_string(),
            quantity,
            unit,
            ingredient_name: name,
        }
    }
}

/// Parse a description with the default parser.
pub fn parse_clauses(description: &str) -> Vec<IngredientClause> {
    ClauseParser::new().parse_clauses(description)
}

fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(['.', ';', ':'])
        .trim()
        .to_lowercase()
}
