//! Nutriplan Core Library
//!
//! Resolves free-text meal descriptions ("100g arroz, 200ml leche,
//! 1 plátano") into macro-nutrient totals using a reference food database.
//!
//! # Architecture
//!
//! ```text
//! description ─▶ Clause Parser ─▶ (qty, unit, name) per clause
//!                                        │
//!                    Reference DB ──▶ Food Matcher ◀── Diet Filter (optional)
//!                                        │
//!                               matched record / none
//!                                        │
//!                                  Unit Converter
//!                                        │
//!                                 Macro Aggregator
//!                                        │
//!                       { totals, per-clause details, unmatched }
//! ```
//!
//! # Failure model
//!
//! Only loading the dataset can fail. A clause that cannot be parsed falls
//! back to a default clause, an ingredient with no match contributes zero
//! and is reported in `unmatched`, and non-finite numbers are coerced to 0
//! before they can reach a total.
//!
//! # Modules
//!
//! - [`config`]: Resolver settings with environment overrides
//! - [`db`]: Reference food repository (JSON files, cached)
//! - [`models`]: Domain types (FoodRecord, IngredientClause, MacroTotal, etc.)
//! - [`resolver`]: Parser, matcher, unit converter, aggregator, diet filter

pub mod config;
pub mod db;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use config::{ConfigError, ResolverConfig};
pub use db::{DataLoadError, FoodRepository, JsonFoodRepository, StaticFoodRepository};
pub use models::{
    FoodRecord, IngredientClause, MacroContribution, MacroTotal, Macros, RoundedMacros, Unit,
};
pub use resolver::{
    parse_clauses, scale_factor, validate_restrictions, DietFilter, FoodMatcher, MacroAggregator,
    MacroResolver, ResolverError, Similarity,
};
