//! Personalized recommendation for a classified food.
//!
//! `AppState` holds an `Arc<dyn RecommendationEngine>`; the default backend is
//! `LlmRecommendationEngine`. When the model answers with something that is not
//! the expected JSON, the engine degrades to `Recommendation::fallback()` rather
//! than failing the save. Transport and API failures are still errors.

pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::user::UserRow;
use crate::nutrition::NutritionRecord;
use crate::recommendation::prompts::{RECOMMENDATION_PROMPT_TEMPLATE, RECOMMENDATION_SYSTEM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Moderate,
    Avoid,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Good => "good",
            Verdict::Moderate => "moderate",
            Verdict::Avoid => "avoid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: Verdict,
    pub recommendation_reason: String,
    pub nutritional_insights: String,
    pub suggestion: String,
}

impl Recommendation {
    /// Used when the model output cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            recommendation: Verdict::Moderate,
            recommendation_reason: "Unable to generate personalized recommendation at this time."
                .to_string(),
            nutritional_insights: "Standard nutritional value".to_string(),
            suggestion: "Consult with a healthcare provider for personalized advice.".to_string(),
        }
    }

    /// Single text block persisted with the prediction.
    pub fn narrative(&self) -> String {
        format!(
            "{}\n\nInsights: {}\n\nSuggestion: {}",
            self.recommendation_reason, self.nutritional_insights, self.suggestion
        )
    }
}

/// Profile fields shared with the model. Name and email stay out of the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct UserContext<'a> {
    pub age: i32,
    pub gender: &'a str,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: &'a str,
    pub goal: &'a str,
    pub target_weight_kg: Option<f64>,
    pub dietary_preference: &'a str,
    pub allergies: Option<&'a str>,
    pub medical_conditions: Option<&'a str>,
    pub daily_calorie_target: Option<i32>,
    pub daily_protein_target: Option<i32>,
}

impl<'a> From<&'a UserRow> for UserContext<'a> {
    fn from(u: &'a UserRow) -> Self {
        Self {
            age: u.age,
            gender: &u.gender,
            weight_kg: u.weight_kg,
            height_cm: u.height_cm,
            activity_level: &u.activity_level,
            goal: &u.goal,
            target_weight_kg: u.target_weight_kg,
            dietary_preference: &u.dietary_preference,
            allergies: u.allergies.as_deref(),
            medical_conditions: u.medical_conditions.as_deref(),
            daily_calorie_target: u.daily_calorie_target,
            daily_protein_target: u.daily_protein_target,
        }
    }
}

/// The food being eaten, as sent to the model.
#[derive(Debug, Clone, Serialize)]
pub struct FoodContext {
    pub food_name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub confidence: f64,
}

impl FoodContext {
    pub fn new(food_name: &str, nutrition: NutritionRecord, confidence: f64) -> Self {
        Self {
            food_name: food_name.to_string(),
            calories: nutrition.calories,
            protein: nutrition.protein,
            carbs: nutrition.carbs,
            fat: nutrition.fat,
            confidence,
        }
    }
}

#[async_trait]
pub trait RecommendationEngine: Send + Sync {
    async fn recommend(
        &self,
        user: &UserRow,
        food: &FoodContext,
    ) -> Result<Recommendation, AppError>;
}

pub struct LlmRecommendationEngine(pub LlmClient);

#[async_trait]
impl RecommendationEngine for LlmRecommendationEngine {
    async fn recommend(
        &self,
        user: &UserRow,
        food: &FoodContext,
    ) -> Result<Recommendation, AppError> {
        let prompt = build_recommendation_prompt(&UserContext::from(user), food)?;
        let system = format!("{RECOMMENDATION_SYSTEM} {JSON_ONLY_INSTRUCTION}");

        info!("Requesting recommendation for '{}'", food.food_name);
        let result = self.0.complete_json::<Recommendation>(&system, &prompt).await;
        recover_recommendation(result)
    }
}

pub fn build_recommendation_prompt(
    user: &UserContext<'_>,
    food: &FoodContext,
) -> Result<String, AppError> {
    let user_json = serde_json::to_string(user).map_err(|e| AppError::Internal(e.into()))?;
    let food_json = serde_json::to_string(food).map_err(|e| AppError::Internal(e.into()))?;
    Ok(RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{user_json}", &user_json)
        .replace("{food_json}", &food_json))
}

/// Unparseable model output becomes the fallback; everything else is an error.
fn recover_recommendation(
    result: Result<Recommendation, LlmError>,
) -> Result<Recommendation, AppError> {
    match result {
        Ok(r) => Ok(r),
        Err(LlmError::Parse(e)) => {
            warn!("Recommendation JSON parse failed, using fallback: {e}");
            Ok(Recommendation::fallback())
        }
        Err(e) => Err(AppError::Llm(format!("Recommendation failed: {e}"))),
    }
}
