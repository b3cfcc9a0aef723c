//! Macro aggregation: parse, match, convert and sum one description.

use tracing::debug;

use crate::config::ResolverConfig;
use crate::models::{FoodRecord, IngredientClause, MacroContribution, MacroTotal};

use super::{ClauseParser, DietFilter, FoodMatcher, UnitConverter};

/// Drives clause parsing, matching and unit conversion for a description.
#[derive(Default)]
pub struct MacroAggregator {
    parser: ClauseParser,
    matcher: FoodMatcher,
    converter: UnitConverter,
}

impl MacroAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            parser: ClauseParser::new(),
            matcher: FoodMatcher::from_config(config),
            converter: UnitConverter::from_config(config),
        }
    }

    /// Replace the matcher (e.g. to plug in another similarity strategy).
    pub fn with_matcher(mut self, matcher: FoodMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Resolve a description against `candidates`.
    ///
    /// Every clause yields one detail entry. Clauses with no matching record
    /// contribute zero and are listed in `unmatched`; with no candidates at
    /// all, every clause ends up there.
    pub fn resolve(&self, description: &str, candidates: &[FoodRecord]) -> MacroTotal {
        let candidates: Vec<&FoodRecord> = candidates.iter().collect();
        self.resolve_among(description, &candidates)
    }

    /// Resolve a description against a borrowed subset of the database.
    pub fn resolve_among(&self, description: &str, candidates: &[&FoodRecord]) -> MacroTotal {
        let details: Vec<MacroContribution> = self
            .parser
            .parse_clauses(description)
            .iter()
            .map(|clause| self.contribution(clause, candidates))
            .collect();

        let total = MacroTotal::from_contributions(details);
        debug!(
            description,
            calories = total.calories,
            protein = total.protein,
            carbs = total.carbs,
            fat = total.fat,
            unmatched = total.unmatched.len(),
            "Resolved description"
        );
        total
    }

    /// Resolve against the candidates compatible with `filter`.
    ///
    /// The narrowed set borrows from `candidates`; no record is copied.
    pub fn resolve_filtered(&self, description: &str, candidates: &[FoodRecord], filter: &DietFilter) -> MacroTotal {
        if filter.is_empty() {
            return self.resolve(description, candidates);
        }
        let narrowed = filter.apply(candidates);
        debug!(
            before = candidates.len(),
            after = narrowed.len(),
            "Applied diet filter"
        );
        self.resolve_among(description, &narrowed)
    }

    /// Resolve a single clause.
    pub fn contribution(&self, clause: &IngredientClause, candidates: &[&FoodRecord]) -> MacroContribution {
        match self.matcher.match_among(&clause.ingredient_name, candidates) {
            Some(found) => {
                let factor = self.converter.scale_factor(clause.quantity, clause.unit);
                let macros = found.record.macros_per_100().scaled(factor);
                MacroContribution::matched(clause, found.record, macros)
            }
            None => MacroContribution::unmatched(clause),
        }
    }
}
