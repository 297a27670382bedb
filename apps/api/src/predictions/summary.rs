use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::prediction::FoodPredictionRow;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_predictions: usize,
    pub total_calories: i64,
    /// Mean confidence percentage, two decimals.
    pub average_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub count: usize,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

pub fn summarize(predictions: &[FoodPredictionRow]) -> HistorySummary {
    let total_calories = predictions.iter().map(|p| i64::from(p.calories)).sum();
    let average_confidence = if predictions.is_empty() {
        0.0
    } else {
        let sum: f64 = predictions.iter().map(|p| f64::from(p.confidence)).sum();
        (sum / predictions.len() as f64 * 100.0).round() / 100.0
    };

    HistorySummary {
        total_predictions: predictions.len(),
        total_calories,
        average_confidence,
    }
}

/// Totals for predictions created on `date` (UTC).
pub fn daily_totals(predictions: &[FoodPredictionRow], date: NaiveDate) -> DailyTotals {
    predictions
        .iter()
        .filter(|p| p.created_at.date_naive() == date)
        .fold(
            DailyTotals {
                date,
                count: 0,
                calories: 0,
                protein: 0.0,
                carbs: 0.0,
                fat: 0.0,
            },
            |mut t, p| {
                t.count += 1;
                t.calories += i64::from(p.calories);
                t.protein += p.protein;
                t.carbs += p.carbs;
                t.fat += p.fat;
                t
            },
        )
}
