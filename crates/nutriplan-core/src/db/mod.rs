//! Reference nutrition database.
//!
//! The dataset is a set of flat JSON files, one per food category. It is
//! read once, normalized, and shared read-only for the rest of the process.

mod loader;
mod search;

pub use loader::*;
pub use search::*;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use thiserror::Error;
use tracing::info;

use crate::config::ResolverConfig;
use crate::models::FoodRecord;

/// Dataset loading errors.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Food data file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type DataLoadResult<T> = Result<T, DataLoadError>;

/// Source of reference food records.
pub trait FoodRepository: Send + Sync {
    /// All records, in dataset order.
    fn foods(&self) -> DataLoadResult<Arc<[FoodRecord]>>;
}

/// File-backed repository, loaded lazily and cached for the process lifetime.
///
/// A failed load is not cached; the next call reads the files again.
/// Concurrent first callers wait on a single load instead of each reading
/// the files.
pub struct JsonFoodRepository {
    data_dir: PathBuf,
    files: Vec<String>,
    cache: OnceLock<Arc<[FoodRecord]>>,
    load_lock: Mutex<()>,
}

impl JsonFoodRepository {
    /// Repository over `files`, resolved relative to `data_dir`.
    pub fn new<P: AsRef<Path>>(data_dir: P, files: Vec<String>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            files,
            cache: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Repository using the data directory and file list from `config`.
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(&config.data_dir, config.food_files.clone())
    }

    /// Full paths of the configured files.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| self.data_dir.join(f)).collect()
    }

    /// Whether a successful load has been cached.
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl FoodRepository for JsonFoodRepository {
    fn foods(&self) -> DataLoadResult<Arc<[FoodRecord]>> {
        if let Some(foods) = self.cache.get() {
            return Ok(Arc::clone(foods));
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished loading while we waited
        if let Some(foods) = self.cache.get() {
            return Ok(Arc::clone(foods));
        }

        let paths = self.paths();
        let foods: Arc<[FoodRecord]> = load_food_files(&paths)?.into();
        info!(
            records = foods.len(),
            files = paths.len(),
            "Loaded reference food database"
        );

        Ok(Arc::clone(self.cache.get_or_init(|| foods)))
    }
}

/// Fixed in-memory repository.
#[derive(Debug, Clone)]
pub struct StaticFoodRepository {
    foods: Arc<[FoodRecord]>,
}

impl StaticFoodRepository {
    pub fn new(foods: Vec<FoodRecord>) -> Self {
        Self { foods: foods.into() }
    }
}

impl FoodRepository for StaticFoodRepository {
    fn foods(&self) -> DataLoadResult<Arc<[FoodRecord]>> {
        Ok(Arc::clone(&self.foods))
    }
}
