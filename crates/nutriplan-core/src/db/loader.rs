//! Dataset file reading and record normalization.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use super::{DataLoadError, DataLoadResult};
use crate::models::{FoodRecord, RawFoodRecord};

/// Load and concatenate several dataset files, in order.
///
/// A file that does not exist is skipped with a warning, unless none of
/// the files exist. Any other read or parse failure fails the whole load.
pub fn load_food_files<P: AsRef<Path>>(paths: &[P]) -> DataLoadResult<Vec<FoodRecord>> {
    let mut foods = Vec::new();
    let mut first_missing = None;
    let mut found = 0usize;

    for path in paths {
        match load_food_file(path.as_ref()) {
            Ok(records) => {
                found += 1;
                foods.extend(records);
            }
            Err(DataLoadError::NotFound(missing)) => {
                warn!(path = %missing.display(), "Food data file not found, skipping it");
                if first_missing.is_none() {
                    first_missing = Some(missing);
                }
            }
            Err(e) => return Err(e),
        }
    }

    match first_missing {
        Some(missing) if found == 0 => Err(DataLoadError::NotFound(missing)),
        _ => Ok(foods),
    }
}

/// Load one dataset file.
pub fn load_food_file(path: &Path) -> DataLoadResult<Vec<FoodRecord>> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::NotFound(path.to_path_buf()),
        _ => DataLoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    parse_food_payload(path, &contents)
}

/// Parse and normalize the contents of one dataset file.
///
/// A payload that is valid JSON but not an array yields no records. Array
/// entries that are not usable records are skipped.
pub fn parse_food_payload(path: &Path, contents: &str) -> DataLoadResult<Vec<FoodRecord>> {
    let payload: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| DataLoadError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    let entries = match payload {
        serde_json::Value::Array(entries) => entries,
        other => {
            warn!(
                path = %path.display(),
                kind = json_kind(&other),
                "Food data payload is not an array, ignoring it"
            );
            return Ok(Vec::new());
        }
    };

    let total = entries.len();
    let foods: Vec<FoodRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| normalize_entry(path, index, entry))
        .collect();

    if foods.len() < total {
        warn!(
            path = %path.display(),
            dropped = total - foods.len(),
            "Dropped unusable food records"
        );
    }

    Ok(foods)
}

fn normalize_entry(path: &Path, index: usize, entry: serde_json::Value) -> Option<FoodRecord> {
    let raw: RawFoodRecord = match serde_json::from_value(entry) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), index, error = %e, "Skipping malformed food record");
            return None;
        }
    };
    match FoodRecord::try_from(raw) {
        Ok(record) => Some(record),
        Err(reason) => {
            warn!(path = %path.display(), index, ?reason, "Skipping food record");
            None
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
