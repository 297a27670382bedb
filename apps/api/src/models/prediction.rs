use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodPredictionRow {
    pub id: Uuid,
    pub user_email: String,
    /// Raw classifier label, before nutrition resolution.
    pub food_name: String,
    pub image_key: Option<String>,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Confidence percentage, rounded.
    pub confidence: i32,
    pub serving_size: String,
    pub recommendation: String,
    pub recommendation_reason: String,
    pub created_at: DateTime<Utc>,
}

/// Values for a new `food_predictions` row.
#[derive(Debug, Clone)]
pub struct NewFoodPrediction {
    pub user_email: String,
    pub food_name: String,
    pub image_key: Option<String>,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub confidence: i32,
    pub serving_size: String,
    pub recommendation: String,
    pub recommendation_reason: String,
}
