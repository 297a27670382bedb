//! Prediction pipeline: validate → load profile → resolve nutrition →
//! recommendation → persist.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::prediction::{FoodPredictionRow, NewFoodPrediction};
use crate::models::user::UserRow;
use crate::nutrition::{resolve_match, Resolution, SERVING_SIZE};
use crate::recommendation::{FoodContext, Recommendation, RecommendationEngine};
use crate::store::Store;

/// A classification to record for a user.
#[derive(Debug, Clone)]
pub struct PredictionInput<'a> {
    pub user_email: &'a str,
    pub food_name: &'a str,
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedPrediction {
    pub prediction: FoodPredictionRow,
    pub recommendation: Recommendation,
    pub nutrition: Resolution,
}

/// Nutrition and recommendation for a label, computed before anything is stored.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub nutrition: Resolution,
    pub recommendation: Recommendation,
}

pub async fn record_prediction(
    store: &dyn Store,
    recommender: &dyn RecommendationEngine,
    input: PredictionInput<'_>,
) -> Result<SavedPrediction, AppError> {
    validate_prediction(input.food_name, input.confidence)?;
    let user = load_user(store, input.user_email).await?;
    let assessment = assess(recommender, &user, input.food_name, input.confidence).await?;
    persist_prediction(store, &user, input, assessment).await
}

/// The registered profile for `email`, or 404.
pub async fn load_user(store: &dyn Store, email: &str) -> Result<UserRow, AppError> {
    store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn assess(
    recommender: &dyn RecommendationEngine,
    user: &UserRow,
    food_name: &str,
    confidence: f64,
) -> Result<Assessment, AppError> {
    let nutrition = resolve_match(food_name);
    info!(
        "Resolved '{}' via {:?} to {:?}",
        food_name, nutrition.tier, nutrition.matched_label
    );

    let food = FoodContext::new(food_name, nutrition.record, confidence);
    let recommendation = recommender.recommend(user, &food).await?;
    Ok(Assessment {
        nutrition,
        recommendation,
    })
}

pub async fn persist_prediction(
    store: &dyn Store,
    user: &UserRow,
    input: PredictionInput<'_>,
    assessment: Assessment,
) -> Result<SavedPrediction, AppError> {
    let Assessment {
        nutrition,
        recommendation,
    } = assessment;
    let record = nutrition.record;

    let prediction = store
        .insert_prediction(NewFoodPrediction {
            user_email: user.email.clone(),
            food_name: input.food_name.to_string(),
            image_key: input.image_key,
            calories: record.calories as i32,
            protein: record.protein,
            carbs: record.carbs,
            fat: record.fat,
            confidence: input.confidence.round() as i32,
            serving_size: SERVING_SIZE.to_string(),
            recommendation: recommendation.recommendation.as_str().to_string(),
            recommendation_reason: recommendation.narrative(),
        })
        .await?;

    Ok(SavedPrediction {
        prediction,
        recommendation,
        nutrition,
    })
}

pub fn validate_prediction(food_name: &str, confidence: f64) -> Result<(), AppError> {
    if food_name.trim().is_empty() {
        return Err(AppError::Validation("food_name cannot be empty".to_string()));
    }
    if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
        return Err(AppError::Validation(
            "confidence must be a percentage between 0 and 100".to_string(),
        ));
    }
    Ok(())
}
