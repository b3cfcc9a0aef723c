//! Resolver configuration.
//!
//! Defaults match the production dataset layout; every value can be
//! overridden from the environment:
//!
//! - `NUTRIPLAN_DATA_DIR`: directory holding the food data files
//! - `NUTRIPLAN_FOOD_FILES`: comma-separated list of file names
//! - `NUTRIPLAN_FUZZY_THRESHOLD`: minimum similarity for fuzzy matches

use std::path::PathBuf;

use thiserror::Error;

pub const ENV_DATA_DIR: &str = "NUTRIPLAN_DATA_DIR";
pub const ENV_FOOD_FILES: &str = "NUTRIPLAN_FOOD_FILES";
pub const ENV_FUZZY_THRESHOLD: &str = "NUTRIPLAN_FUZZY_THRESHOLD";

/// Fuzzy matches must rate strictly above this.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.4;

/// Approximate weight of one spoonful, in grams.
pub const DEFAULT_GRAMS_PER_TABLESPOON: f64 = 10.0;
pub const DEFAULT_GRAMS_PER_TEASPOON: f64 = 10.0;

/// Category files of the reference dataset, in load order.
pub const DEFAULT_FOOD_FILES: [&str; 5] = [
    "alimentos_proteicos.json",
    "alimentos_carbohidratos.json",
    "alimentos_verduras_frutas.json",
    "alimentos_otros.json",
    "alimentos_ultraprocesados.json",
];

/// Configuration errors.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by the repository and the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub data_dir: PathBuf,
    pub food_files: Vec<String>,
    pub fuzzy_threshold: f64,
    pub grams_per_tablespoon: f64,
    pub grams_per_teaspoon: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            food_files: DEFAULT_FOOD_FILES.iter().map(|f| f.to_string()).collect(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            grams_per_tablespoon: DEFAULT_GRAMS_PER_TABLESPOON,
            grams_per_teaspoon: DEFAULT_GRAMS_PER_TEASPOON,
        }
    }
}

impl ResolverConfig {
    /// Defaults with overrides read from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir.trim());
        }

        if let Some(files) = lookup(ENV_FOOD_FILES) {
            let files: Vec<String> = files
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
            if files.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_FOOD_FILES,
                    value: String::new(),
                    reason: "no file names",
                });
            }
            config.food_files = files;
        }

        if let Some(raw) = lookup(ENV_FUZZY_THRESHOLD) {
            config.fuzzy_threshold = parse_threshold(&raw)?;
        }

        Ok(config)
    }

    /// Replace the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

fn parse_threshold(raw: &str) -> ConfigResult<f64> {
    let invalid = |reason| ConfigError::InvalidValue {
        key: ENV_FUZZY_THRESHOLD,
        value: raw.to_string(),
        reason,
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid("must be between 0 and 1"));
    }
    Ok(value)
}
