//! Meal-description resolver.
//!
//! Pipeline: Clause Parsing → Food Matching (optionally diet-filtered)
//! → Unit Conversion → Aggregation

mod aggregator;
mod diet;
mod matcher;
mod parser;
mod units;

pub use aggregator::*;
pub use diet::*;
pub use matcher::*;
pub use parser::*;
pub use units::*;

use thiserror::Error;
use tracing::error;

use crate::config::ResolverConfig;
use crate::db::{search_by_name, DataLoadError, FoodRepository};
use crate::models::{FoodRecord, MacroTotal};

/// Resolver errors.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Food database unavailable: {0}")]
    DataLoad(#[from] DataLoadError),
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Resolves meal descriptions against a food repository.
pub struct MacroResolver<'a> {
    repository: &'a dyn FoodRepository,
    aggregator: MacroAggregator,
}

impl<'a> MacroResolver<'a> {
    /// Create a resolver with default settings.
    pub fn new(repository: &'a dyn FoodRepository) -> Self {
        Self {
            repository,
            aggregator: MacroAggregator::new(),
        }
    }

    /// Create a resolver using thresholds and spoon weights from `config`.
    pub fn with_config(repository: &'a dyn FoodRepository, config: &ResolverConfig) -> Self {
        Self {
            repository,
            aggregator: MacroAggregator::from_config(config),
        }
    }

    /// Replace the food matcher.
    pub fn with_matcher(mut self, matcher: FoodMatcher) -> Self {
        self.aggregator = self.aggregator.with_matcher(matcher);
        self
    }

    /// Resolve a description, surfacing dataset load failures.
    pub fn try_resolve(&self, description: &str) -> ResolverResult<MacroTotal> {
        let foods = self.repository.foods()?;
        Ok(self.aggregator.resolve(description, &foods))
    }

    /// Resolve a description against the diet-compatible records only.
    pub fn try_resolve_filtered(&self, description: &str, filter: &DietFilter) -> ResolverResult<MacroTotal> {
        let foods = self.repository.foods()?;
        Ok(self.aggregator.resolve_filtered(description, &foods, filter))
    }

    /// Resolve a description.
    ///
    /// If the dataset cannot be loaded the result is an all-zero total with
    /// no details, so plan generation can carry on.
    pub fn resolve(&self, description: &str) -> MacroTotal {
        self.try_resolve(description).unwrap_or_else(|e| {
            error!(error = %e, "Resolving without food data");
            MacroTotal::default()
        })
    }

    /// Diet-filtered variant of [`MacroResolver::resolve`].
    pub fn resolve_filtered(&self, description: &str, filter: &DietFilter) -> MacroTotal {
        self.try_resolve_filtered(description, filter)
            .unwrap_or_else(|e| {
                error!(error = %e, "Resolving without food data");
                MacroTotal::default()
            })
    }

    /// Resolve several descriptions.
    pub fn resolve_all<S: AsRef<str>>(&self, descriptions: &[S]) -> Vec<MacroTotal> {
        descriptions.iter().map(|d| self.resolve(d.as_ref())).collect()
    }

    /// Look up records by name.
    pub fn search(&self, name: &str, limit: usize) -> ResolverResult<Vec<FoodRecord>> {
        let foods = self.repository.foods()?;
        Ok(search_by_name(&foods, name, limit).into_iter().cloned().collect())
    }

    /// Get the aggregator for direct access.
    pub fn aggregator(&self) -> &MacroAggregator {
        &self.aggregator
    }
}
