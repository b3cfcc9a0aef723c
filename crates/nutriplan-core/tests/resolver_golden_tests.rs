//! Golden tests for the meal-description resolver.
//!
//! These tests pin the clause grammar and end-to-end totals against known
//! descriptions.

use nutriplan_core::models::{FoodRecord, Unit};
use nutriplan_core::resolver::{parse_clauses, scale_factor, MacroAggregator};

/// Parser case from the golden table.
struct GoldenClause {
    id: &'static str,
    input: &'static str,
    expected: &'static [(f64, Unit, &'static str)],
}

fn get_golden_clauses() -> Vec<GoldenClause> {
    vec![
        GoldenClause {
            id: "reference-breakfast",
            input: "100g arroz, 200ml leche, 1 plátano",
            expected: &[
                (100.0, Unit::Grams, "arroz"),
                (200.0, Unit::Millilitres, "leche"),
                (1.0, Unit::Grams, "plátano"),
            ],
        },
        GoldenClause {
            id: "oats-and-fruit",
            input: "60g avena, 250ml bebida de almendra, 1 ud manzana",
            expected: &[
                (60.0, Unit::Grams, "avena"),
                (250.0, Unit::Millilitres, "bebida de almendra"),
                (1.0, Unit::Units, "manzana"),
            ],
        },
        GoldenClause {
            id: "spoons",
            input: "1 cucharada aceite de oliva, 1 cucharadita miel",
            expected: &[
                (1.0, Unit::Tablespoon, "aceite de oliva"),
                (1.0, Unit::Teaspoon, "miel"),
            ],
        },
        GoldenClause {
            id: "uppercase-units",
            input: "150G Pechuga de pollo, 2 UDS Huevo",
            expected: &[
                (150.0, Unit::Grams, "pechuga de pollo"),
                (2.0, Unit::Units, "huevo"),
            ],
        },
        GoldenClause {
            id: "no-quantities",
            input: "Ensalada mixta, vinagreta",
            expected: &[
                (1.0, Unit::Grams, "ensalada mixta"),
                (1.0, Unit::Grams, "vinagreta"),
            ],
        },
        GoldenClause {
            id: "decimal-and-connector",
            input: "1.5 unidades de tortilla, 30g de nueces",
            expected: &[(1.5, Unit::Units, "tortilla"), (30.0, Unit::Grams, "nueces")],
        },
        GoldenClause {
            id: "stray-separators",
            input: ", 100g arroz ,, ",
            expected: &[(100.0, Unit::Grams, "arroz")],
        },
    ]
}

#[test]
fn test_golden_clauses() {
    for case in get_golden_clauses() {
        let clauses = parse_clauses(case.input);
        assert_eq!(
            clauses.len(),
            case.expected.len(),
            "Case {}: clause count mismatch",
            case.id
        );

        for (clause, (qty, unit, name)) in clauses.iter().zip(case.expected) {
            assert_eq!(clause.quantity, *qty, "Case {}: quantity mismatch", case.id);
            assert_eq!(clause.unit, *unit, "Case {}: unit mismatch", case.id);
            assert_eq!(
                clause.ingredient_name, *name,
                "Case {}: name mismatch",
                case.id
            );
        }
    }
}

#[test]
fn test_reference_scale_factors() {
    assert_eq!(scale_factor(200.0, Unit::Grams), 2.0);
    assert_eq!(scale_factor(1.0, Unit::from_token("ud")), 1.0);
    assert_eq!(scale_factor(2.0, Unit::from_token("cucharada")), 0.2);
}

fn reference_foods() -> Vec<FoodRecord> {
    vec![
        FoodRecord::new("Arroz blanco cocido", 130.0, 2.4, 28.0, 0.3),
        FoodRecord::new("Leche entera", 64.0, 3.3, 4.8, 3.6),
        FoodRecord::new("Plátano", 89.0, 1.1, 23.0, 0.3),
        FoodRecord::new("Avena en copos", 389.0, 16.9, 66.0, 6.9),
        FoodRecord::new("Huevo entero", 155.0, 13.0, 1.1, 11.0),
        FoodRecord::new("Aceite de oliva virgen extra", 884.0, 0.0, 0.0, 100.0),
    ]
}

#[test]
fn test_end_to_end_rice() {
    let total = MacroAggregator::new().resolve("100g arroz", &reference_foods());

    assert_eq!(total.calories, 130.0);
    assert_eq!(total.protein, 2.4);
    assert_eq!(total.carbs, 28.0);
    assert_eq!(total.fat, 0.3);
    assert!(total.unmatched.is_empty());
}

#[test]
fn test_end_to_end_breakfast() {
    let total = MacroAggregator::new().resolve(
        "60g avena, 200ml leche, 2 uds huevo, 1 cucharada aceite de oliva",
        &reference_foods(),
    );

    // 233.4 + 128 + 310 + 88.4
    assert!((total.calories - 759.8).abs() < 1e-6);
    assert!(total.unmatched.is_empty());
    assert_eq!(total.rounded().calories, 760);
    assert_eq!(
        total.details[3].matched_food.as_deref(),
        Some("Aceite de oliva virgen extra")
    );
}

#[test]
fn test_unknown_ingredient_reported() {
    let total = MacroAggregator::new().resolve("100g arroz, 40g xyzzy", &reference_foods());

    assert_eq!(total.calories, 130.0);
    assert_eq!(total.details.len(), 2);
    assert!(total.details[1].macros().is_zero());
    assert_eq!(total.unmatched, vec!["xyzzy".to_string()]);
}

#[test]
fn test_empty_database_lists_every_clause() {
    let total = MacroAggregator::new().resolve("100g arroz, 200ml leche, 1 plátano", &[]);

    assert!(total.is_zero());
    assert_eq!(total.details.len(), 3);
    assert_eq!(
        total.unmatched,
        vec!["arroz".to_string(), "leche".to_string(), "plátano".to_string()]
    );
}

#[test]
fn test_resolution_is_repeatable() {
    let foods = reference_foods();
    let aggregator = MacroAggregator::new();
    let description = "60g avena, 200ml leche, 1 plátano, 10g xyzzy";

    let first = aggregator.resolve(description, &foods);
    let second = aggregator.resolve(description, &foods);
    assert_eq!(first, second);
    assert_eq!(first.calories.to_bits(), second.calories.to_bits());
}
