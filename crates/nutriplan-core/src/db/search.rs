//! Name lookup over the reference database.

use crate::models::FoodRecord;

/// Default number of results returned by a name lookup.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Case-insensitive substring search over record names.
///
/// Results keep dataset order; at most `limit` are returned.
pub fn search_by_name<'a>(foods: &'a [FoodRecord], query: &str, limit: usize) -> Vec<&'a FoodRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    foods
        .iter()
        .filter(|f| f.search_key().contains(&needle))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foods() -> Vec<FoodRecord> {
        vec![
            FoodRecord::new("Arroz blanco cocido", 130.0, 2.4, 28.0, 0.3),
            FoodRecord::new("Leche entera", 64.0, 3.3, 4.8, 3.6),
            FoodRecord::new("Arroz integral", 111.0, 2.6, 23.0, 0.9),
            FoodRecord::new("Bebida de arroz", 47.0, 0.3, 9.4, 1.0),
        ]
    }

    #[test]
    fn test_search_case_insensitive_in_order() {
        let foods = foods();
        let results = search_by_name(&foods, "ARROZ", DEFAULT_SEARCH_LIMIT);
        let names: Vec<&str> = results.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Arroz blanco cocido", "Arroz integral", "Bebida de arroz"]
        );
    }

    #[test]
    fn test_search_limit() {
        let foods = foods();
        assert_eq!(search_by_name(&foods, "arroz", 2).len(), 2);
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let foods = foods();
        assert!(search_by_name(&foods, "  ", DEFAULT_SEARCH_LIMIT).is_empty());
    }
}
