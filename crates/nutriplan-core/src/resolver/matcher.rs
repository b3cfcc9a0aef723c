//! Food matching: substring lookup with a fuzzy fallback.
//!
//! 1. First record whose lower-cased name contains the ingredient name.
//!    Dataset order decides; the first hit wins, not the best.
//! 2. Otherwise the record with the highest similarity rating, accepted
//!    only when the rating is strictly above the threshold. Equal ratings
//!    resolve to the earliest record.

use std::collections::HashMap;

use strsim::{jaro_winkler, normalized_levenshtein};
use tracing::debug;

use crate::config::{ResolverConfig, DEFAULT_FUZZY_THRESHOLD};
use crate::models::FoodRecord;

/// String similarity strategy, rating in `[0, 1]`.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Dice coefficient over character bigrams, whitespace ignored.
///
/// Lengths are counted in characters, so accented names rate the same as
/// their unaccented spelling would.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiceSimilarity;

impl Similarity for DiceSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
        let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

        if a == b {
            return 1.0;
        }
        if a.len() < 2 || b.len() < 2 {
            return 0.0;
        }

        let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
        for pair in a.windows(2) {
            *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
        }

        let mut shared = 0usize;
        for pair in b.windows(2) {
            if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
                if *count > 0 {
                    *count -= 1;
                    shared += 1;
                }
            }
        }

        (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
    }
}

/// Jaro-Winkler blended with normalized Levenshtein.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlendedSimilarity;

impl Similarity for BlendedSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        // Jaro-Winkler is better for prefix matching, so it weighs more
        jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
    }
}

/// How a record was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Substring,
    Fuzzy { rating: f64 },
}

/// A matched reference record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodMatch<'c> {
    pub record: &'c FoodRecord,
    pub index: usize,
    pub kind: MatchKind,
}

/// Resolves ingredient names to reference records.
pub struct FoodMatcher {
    similarity: Box<dyn Similarity>,
    threshold: f64,
}

impl Default for FoodMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodMatcher {
    /// Matcher with Dice similarity and the default threshold.
    pub fn new() -> Self {
        Self::with_similarity(DiceSimilarity, DEFAULT_FUZZY_THRESHOLD)
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::with_similarity(DiceSimilarity, config.fuzzy_threshold)
    }

    pub fn with_similarity<S: Similarity + 'static>(similarity: S, threshold: f64) -> Self {
        Self {
            similarity: Box::new(similarity),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolve `name` against `candidates`.
    pub fn match_food<'c>(&self, name: &str, candidates: &'c [FoodRecord]) -> Option<FoodMatch<'c>> {
        self.find(name, candidates.iter())
    }

    /// Resolve `name` against a borrowed subset of the database.
    ///
    /// `FoodMatch::index` is the position within `candidates`.
    pub fn match_among<'c>(&self, name: &str, candidates: &[&'c FoodRecord]) -> Option<FoodMatch<'c>> {
        self.find(name, candidates.iter().copied())
    }

    fn find<'c, I>(&self, name: &str, candidates: I) -> Option<FoodMatch<'c>>
    where
        I: Iterator<Item = &'c FoodRecord> + Clone,
    {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some((index, record)) = candidates
            .clone()
            .enumerate()
            .find(|(_, c)| c.search_key().contains(&needle))
        {
            debug!(ingredient = %needle, food = %record.name, "Substring match");
            return Some(FoodMatch {
                record,
                index,
                kind: MatchKind::Substring,
            });
        }

        let (index, record, rating) = self.best_rating(&needle, candidates)?;
        if rating > self.threshold {
            debug!(ingredient = %needle, food = %record.name, rating, "Fuzzy match");
            Some(FoodMatch {
                record,
                index,
                kind: MatchKind::Fuzzy { rating },
            })
        } else {
            debug!(ingredient = %needle, best_rating = rating, "No match above threshold");
            None
        }
    }

    /// Highest-rated candidate; the earliest one wins on equal ratings.
    fn best_rating<'c, I>(&self, needle: &str, candidates: I) -> Option<(usize, &'c FoodRecord, f64)>
    where
        I: Iterator<Item = &'c FoodRecord>,
    {
        let mut best: Option<(usize, &'c FoodRecord, f64)> = None;
        for (index, candidate) in candidates.enumerate() {
            let rating = self.similarity.similarity(needle, candidate.search_key());
            let rating = if rating.is_finite() { rating } else { 0.0 };
            match best {
                Some((_, _, top)) if rating <= top => {}
                _ => best = Some((index, candidate, rating)),
            }
        }
        best
    }
}

/// Match with the default matcher.
pub fn match_food<'c>(name: &str, candidates: &'c [FoodRecord]) -> Option<&'c FoodRecord> {
    FoodMatcher::new().match_food(name, candidates).map(|m| m.record)
}
