//! Plan and meal extraction from LLM output.

use thiserror::Error;
use tracing::debug;

use crate::plan::{Meal, NutritionPlan, MIN_PLAN_DAYS};

/// Marker opening the JSON payload of a generated plan.
pub const JSON_START: &str = "###JSON_START###";
/// Marker closing the JSON payload of a generated plan.
pub const JSON_END: &str = "###JSON_END###";

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Response is missing the ###JSON_START### / ###JSON_END### markers")]
    MissingDelimiters,

    #[error("Plan covers {days} days, a full week is required")]
    IncompletePlan { days: usize },
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Extract a full plan from a generator response.
///
/// The payload is the text between [`JSON_START`] and the first
/// [`JSON_END`] after it.
pub fn extract_plan(content: &str) -> ExtractionResult<NutritionPlan> {
    let start = content.find(JSON_START).ok_or(ExtractionError::MissingDelimiters)?;
    let body = &content[start + JSON_START.len()..];
    let end = body.find(JSON_END).ok_or(ExtractionError::MissingDelimiters)?;

    parse_plan(&body[..end])
}

/// Parse a bare plan document and check it covers a full week.
pub fn parse_plan(json: &str) -> ExtractionResult<NutritionPlan> {
    let plan: NutritionPlan = serde_json::from_str(json.trim())?;
    if plan.days.len() < MIN_PLAN_DAYS {
        return Err(ExtractionError::IncompletePlan {
            days: plan.days.len(),
        });
    }
    debug!(days = plan.days.len(), meals = plan.meal_count(), "Parsed plan");
    Ok(plan)
}

/// Extract a single regenerated meal from a response.
pub fn extract_meal(content: &str) -> ExtractionResult<Meal> {
    // The model may wrap the object in prose or code fences
    let json_start = content.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = content.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let meal: Meal = serde_json::from_str(&content[json_start..=json_end])?;
    Ok(meal)
}
