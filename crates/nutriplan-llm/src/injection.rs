//! Re-inject resolved macros into generated plans.
//!
//! The generator's own macro figures are not trusted: every meal is
//! re-resolved from its description against the food database and the
//! four macro fields are overwritten with the resolver's rounded totals.

use nutriplan_core::resolver::RestrictionResult;
use nutriplan_core::{validate_restrictions, DietFilter, MacroResolver, MacroTotal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::plan::{Meal, NutritionPlan, PlanMacros};

/// Diet tags foods carry in `aptoPara`, the restriction label naming each
/// diet, and the lower-cased spellings that select it.
const DIETS: &[(&str, &str, &[&str])] = &[
    ("vegana", "Vegano", &["vegano", "vegana"]),
    ("vegetariana", "Vegetariano", &["vegetariano", "vegetariana"]),
    ("keto", "Dieta keto", &["dieta keto", "keto"]),
    (
        "mediterranea",
        "Dieta mediterránea",
        &["dieta mediterránea", "dieta mediterranea", "mediterránea", "mediterranea"],
    ),
];

/// Prefixes introducing an ingredient to exclude. Longest first.
const EXCLUSION_PREFIXES: &[&str] = &[
    "intolerancia a la ",
    "intolerancia al ",
    "intolerancia a ",
    "alergia a los ",
    "alergia a la ",
    "alergia al ",
    "alergia a ",
    "sin ",
];

/// Overwrite a meal's macro fields with the rounded totals.
pub fn apply_macros(meal: &mut Meal, total: &MacroTotal) {
    meal.set_macros(total.rounded());
}

/// Look up a diet by label or tag, returning `(tag, restriction label)`.
pub fn lookup_diet(label: &str) -> Option<(&'static str, &'static str)> {
    let label = label.trim().to_lowercase();
    DIETS
        .iter()
        .find(|(_, _, spellings)| spellings.contains(&label.as_str()))
        .map(|(tag, name, _)| (*tag, *name))
}

/// Build a filter from an explicit diet and exclusion terms.
///
/// The diet may be a restriction label ("Vegano") or a dataset tag
/// ("vegana"); unknown diets are used as a tag as written. The diet is
/// validated together with the exclusions.
pub fn selection_filter<S: AsRef<str>>(diet: Option<&str>, exclusions: &[S]) -> RestrictionResult<DietFilter> {
    let mut selected: Vec<String> = exclusions.iter().map(|e| e.as_ref().to_string()).collect();
    let mut filter = DietFilter::new().with_restrictions(selected.clone());

    if let Some(diet) = diet.map(str::trim).filter(|d| !d.is_empty()) {
        match lookup_diet(diet) {
            Some((tag, label)) => {
                selected.push(label.to_string());
                filter = filter.with_diet(tag);
            }
            None => {
                selected.push(diet.to_string());
                filter = filter.with_diet(diet.to_lowercase());
            }
        }
    }

    validate_restrictions(&selected)?;
    Ok(filter)
}

/// Build a diet filter from free-form plan restriction labels.
///
/// Diet labels ("Vegano", "Dieta keto") select the diet. Intolerances,
/// allergies and "sin ..." labels become exclusion terms. Anything else
/// ("Ninguna", "Low carb") does not narrow the database.
pub fn diet_filter_for<S: AsRef<str>>(labels: &[S]) -> DietFilter {
    let mut filter = DietFilter::new();
    let mut excluded = Vec::new();

    for label in labels {
        let label = label.as_ref().trim().to_lowercase();
        if let Some(term) = EXCLUSION_PREFIXES
            .iter()
            .find_map(|prefix| label.strip_prefix(prefix))
        {
            let term = term.trim();
            if !term.is_empty() {
                excluded.push(term.to_string());
            }
        } else if let Some((tag, _)) = lookup_diet(&label) {
            if filter.diet.is_none() {
                filter = filter.with_diet(tag);
            }
        } else {
            debug!(label = %label, "Restriction label does not narrow the food database");
        }
    }

    filter.with_restrictions(excluded)
}

/// Unmatched ingredients of one meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealReport {
    pub day: String,
    pub meal: String,
    pub unmatched: Vec<String>,
}

/// Outcome of injecting macros into a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectionReport {
    pub meals_resolved: usize,
    pub incomplete_meals: Vec<MealReport>,
}

impl InjectionReport {
    /// True when every ingredient of every meal resolved.
    pub fn is_complete(&self) -> bool {
        self.incomplete_meals.is_empty()
    }

    pub fn unmatched_count(&self) -> usize {
        self.incomplete_meals.iter().map(|m| m.unmatched.len()).sum()
    }
}

/// Resolves every meal of a plan and writes the macros back.
pub struct PlanMacroInjector<'a> {
    resolver: &'a MacroResolver<'a>,
    filter: Option<DietFilter>,
}

impl<'a> PlanMacroInjector<'a> {
    pub fn new(resolver: &'a MacroResolver<'a>) -> Self {
        Self {
            resolver,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: DietFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Filter the database using the plan's own restriction labels.
    ///
    /// Fails when the labels combine incompatible diets.
    pub fn for_plan_restrictions(
        resolver: &'a MacroResolver<'a>,
        plan: &NutritionPlan,
    ) -> RestrictionResult<Self> {
        validate_restrictions(&plan.restrictions)?;
        Ok(Self::new(resolver).with_filter(diet_filter_for(&plan.restrictions)))
    }

    /// Resolve one meal description, applying the filter if set.
    pub fn resolve_meal(&self, meal: &Meal) -> MacroTotal {
        match &self.filter {
            Some(filter) => self.resolver.resolve_filtered(&meal.description, filter),
            None => self.resolver.resolve(&meal.description),
        }
    }

    /// Overwrite every meal's macros and recompute the plan's daily average.
    pub fn inject(&self, plan: &mut NutritionPlan) -> InjectionReport {
        let mut report = InjectionReport::default();

        for (index, day) in plan.days.iter_mut().enumerate() {
            let day_label = day
                .label
                .clone()
                .unwrap_or_else(|| format!("Día {}", index + 1));

            for meal in day.meals_mut() {
                let total = self.resolve_meal(meal);
                apply_macros(meal, &total);
                report.meals_resolved += 1;

                if !total.unmatched.is_empty() {
                    warn!(
                        day = %day_label,
                        meal = %meal.name,
                        unmatched = ?total.unmatched,
                        "Meal has ingredients missing from the food database"
                    );
                    report.incomplete_meals.push(MealReport {
                        day: day_label.clone(),
                        meal: meal.name.clone(),
                        unmatched: total.unmatched,
                    });
                }
            }
        }

        if let Some(average) = plan.daily_average() {
            plan.macros = Some(PlanMacros::from(average.rounded()));
        }

        info!(
            meals = report.meals_resolved,
            incomplete = report.incomplete_meals.len(),
            "Injected macros into plan"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Day;
    use nutriplan_core::{FoodRecord, StaticFoodRepository};

    fn repository() -> StaticFoodRepository {
        StaticFoodRepository::new(vec![
            FoodRecord::new("Arroz blanco", 130.0, 2.4, 28.0, 0.3)
                .with_suitable_for(["vegana", "vegetariana"]),
            FoodRecord::new("Pechuga de pollo", 165.0, 31.0, 0.0, 3.6),
            FoodRecord::new("Pan de trigo", 265.0, 9.0, 49.0, 3.2)
                .with_description("Contiene gluten")
                .with_suitable_for(["vegana", "vegetariana"]),
            FoodRecord::new("Tofu", 76.0, 8.0, 1.9, 4.8).with_suitable_for(["vegana"]),
        ])
    }

    fn day(label: &str, lunch: &str, dinner: &str) -> Day {
        Day {
            label: Some(label.to_string()),
            lunch: Some(Meal::new("Comida", lunch)),
            dinner: Some(Meal::new("Cena", dinner)),
            ..Day::default()
        }
    }

    #[test]
    fn test_apply_macros_rounds() {
        let mut meal = Meal::new("Arroz", "100g de arroz");
        let total = MacroTotal {
            calories: 130.5,
            protein: 2.4,
            carbs: 27.5,
            fat: 0.3,
            ..MacroTotal::default()
        };

        apply_macros(&mut meal, &total);
        assert_eq!(meal.calories, 131.0);
        assert_eq!(meal.protein, 2.0);
        assert_eq!(meal.carbs, 28.0);
        assert_eq!(meal.fat, 0.0);
    }

    #[test]
    fn test_inject_overwrites_every_meal() {
        let repo = repository();
        let resolver = MacroResolver::new(&repo);
        let mut plan = NutritionPlan {
            days: vec![
                day("Lunes", "100g de arroz, 200g de pollo", "100g de tofu"),
                day("Martes", "200g de arroz", "50g de pan"),
            ],
            ..NutritionPlan::default()
        };
        plan.days[0].lunch.as_mut().unwrap().calories = 9999.0;

        let report = PlanMacroInjector::new(&resolver).inject(&mut plan);

        assert_eq!(report.meals_resolved, 4);
        assert!(report.is_complete());

        let lunch = plan.days[0].lunch.as_ref().unwrap();
        assert_eq!(lunch.calories, 460.0);
        assert_eq!(lunch.protein, 64.0);

        // Averaged from the rounded meals: (460 + 76 + 260 + 133) / 2
        let macros = plan.macros.unwrap();
        assert_eq!(macros.calories, 465.0);
    }

    #[test]
    fn test_inject_reports_unmatched_ingredients() {
        let repo = repository();
        let resolver = MacroResolver::new(&repo);
        let mut plan = NutritionPlan {
            days: vec![day("Lunes", "100g de arroz, 30g de xyzzy", "100g de tofu")],
            ..NutritionPlan::default()
        };

        let report = PlanMacroInjector::new(&resolver).inject(&mut plan);

        assert!(!report.is_complete());
        assert_eq!(report.unmatched_count(), 1);
        assert_eq!(report.incomplete_meals[0].day, "Lunes");
        assert_eq!(report.incomplete_meals[0].meal, "Comida");
        assert_eq!(report.incomplete_meals[0].unmatched, vec!["xyzzy"]);
        assert_eq!(plan.days[0].lunch.as_ref().unwrap().calories, 130.0);
    }

    #[test]
    fn test_unlabelled_days_are_numbered() {
        let repo = repository();
        let resolver = MacroResolver::new(&repo);
        let mut plan = NutritionPlan {
            days: vec![Day {
                snacks: vec![Meal::new("Snack", "10g de xyzzy")],
                ..Day::default()
            }],
            ..NutritionPlan::default()
        };

        let report = PlanMacroInjector::new(&resolver).inject(&mut plan);
        assert_eq!(report.incomplete_meals[0].day, "Día 1");
    }

    #[test]
    fn test_diet_filter_for_labels() {
        let filter = diet_filter_for(&["Vegano", "Intolerancia al gluten", "Ninguna", "Low carb"]);

        assert_eq!(filter.diet.as_deref(), Some("vegana"));
        assert_eq!(filter.restrictions, vec!["gluten"]);

        let filter = diet_filter_for(&["Alergia a frutos secos", "Sin lactosa"]);
        assert!(filter.diet.is_none());
        assert_eq!(filter.restrictions, vec!["frutos secos", "lactosa"]);

        assert!(diet_filter_for::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_selection_filter_maps_diet_label_to_tag() {
        let filter = selection_filter(Some("Vegano"), &["gluten"]).unwrap();
        assert_eq!(filter.diet.as_deref(), Some("vegana"));
        assert_eq!(filter.restrictions, vec!["gluten"]);

        let filter = selection_filter::<&str>(Some("vegetariana"), &[]).unwrap();
        assert_eq!(filter.diet.as_deref(), Some("vegetariana"));

        let filter = selection_filter::<&str>(Some("Paleo"), &[]).unwrap();
        assert_eq!(filter.diet.as_deref(), Some("paleo"));

        assert!(selection_filter::<&str>(None, &[]).unwrap().is_empty());
        assert!(selection_filter::<&str>(Some("  "), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_selection_filter_validates_diet_with_exclusions() {
        assert!(selection_filter(Some("Dieta keto"), &["Vegetariano"]).is_err());
        // The tag is validated under its restriction label
        assert!(selection_filter(Some("vegana"), &["Dieta mediterránea"]).is_err());
        assert!(selection_filter(Some("keto"), &["lactosa"]).is_ok());
    }

    #[test]
    fn test_selection_filter_resolves_against_tagged_foods() {
        let repo = repository();
        let resolver = MacroResolver::new(&repo);
        let filter = selection_filter::<&str>(Some("Vegano"), &[]).unwrap();

        let total = resolver.resolve_filtered("100g de tofu, 100g de pollo", &filter);
        assert_eq!(total.calories, 76.0);
        assert_eq!(total.unmatched, vec!["pollo"]);
    }

    #[test]
    fn test_filtered_injection_uses_plan_restrictions() {
        let repo = repository();
        let resolver = MacroResolver::new(&repo);
        let mut plan = NutritionPlan {
            days: vec![day("Lunes", "200g de pollo", "50g de pan")],
            restrictions: vec!["Vegano".into(), "Intolerancia al gluten".into()],
            ..NutritionPlan::default()
        };

        let injector = PlanMacroInjector::for_plan_restrictions(&resolver, &plan).unwrap();
        let report = injector.inject(&mut plan);

        // Chicken is not vegan and bread mentions gluten
        assert_eq!(report.unmatched_count(), 2);
        assert_eq!(plan.days[0].lunch.as_ref().unwrap().calories, 0.0);
        assert_eq!(plan.days[0].dinner.as_ref().unwrap().calories, 0.0);
    }

    #[test]
    fn test_incompatible_plan_restrictions_rejected() {
        let repo = repository();
        let resolver = MacroResolver::new(&repo);
        let plan = NutritionPlan {
            restrictions: vec!["Vegetariano".into(), "Vegano".into()],
            ..NutritionPlan::default()
        };

        assert!(PlanMacroInjector::for_plan_restrictions(&resolver, &plan).is_err());
    }
}
