//! Property tests for the parser and aggregator.

use nutriplan_core::models::FoodRecord;
use nutriplan_core::resolver::{parse_clauses, MacroAggregator};
use proptest::prelude::*;

fn foods() -> Vec<FoodRecord> {
    vec![
        FoodRecord::new("Arroz blanco cocido", 130.0, 2.4, 28.0, 0.3),
        FoodRecord::new("Leche entera", 64.0, 3.3, 4.8, 3.6),
        FoodRecord::new("Aceite de oliva", 884.0, 0.0, 0.0, 100.0),
        FoodRecord::new("Corrupto", f64::MAX, f64::NAN, f64::INFINITY, 0.0),
    ]
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-záéíóúñ ]{0,20}",
        (0u32..100_000, "(g|ml|uds|cucharada|cucharadita)?", "[a-z ]{0,15}")
            .prop_map(|(q, u, n)| format!("{q}{u} {n}")),
        ".{0,20}",
    ]
}

proptest! {
    #[test]
    fn parser_keeps_every_non_empty_segment(segments in prop::collection::vec(segment(), 0..8)) {
        let description = segments.join(",");
        let expected = description
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .count();

        let clauses = parse_clauses(&description);
        prop_assert_eq!(clauses.len(), expected);
        for clause in &clauses {
            prop_assert!(!clause.ingredient_name.is_empty());
            prop_assert!(clause.quantity.is_finite());
        }
    }

    #[test]
    fn totals_are_always_finite(segments in prop::collection::vec(segment(), 0..8)) {
        let description = segments.join(",");
        let total = MacroAggregator::new().resolve(&description, &foods());

        prop_assert!(total.calories.is_finite());
        prop_assert!(total.protein.is_finite());
        prop_assert!(total.carbs.is_finite());
        prop_assert!(total.fat.is_finite());
        for detail in &total.details {
            if detail.matched_food.is_none() {
                prop_assert!(detail.macros().is_zero());
            }
        }
    }

    #[test]
    fn resolution_is_idempotent(segments in prop::collection::vec(segment(), 0..6)) {
        let description = segments.join(",");
        let foods = foods();
        let aggregator = MacroAggregator::new();

        let first = aggregator.resolve(&description, &foods);
        let second = aggregator.resolve(&description, &foods);
        prop_assert_eq!(first.calories.to_bits(), second.calories.to_bits());
        prop_assert_eq!(first.details, second.details);
        prop_assert_eq!(first.unmatched, second.unmatched);
    }

    #[test]
    fn unmatched_has_no_duplicates(segments in prop::collection::vec(segment(), 0..8)) {
        let description = segments.join(",");
        let total = MacroAggregator::new().resolve(&description, &[]);

        let mut seen = std::collections::HashSet::new();
        for name in &total.unmatched {
            prop_assert!(seen.insert(name.trim().to_lowercase()));
        }
        prop_assert_eq!(total.details.len(), parse_clauses(&description).len());
    }
}
