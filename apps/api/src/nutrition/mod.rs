// Nutrition lookup: fixed reference table plus the label resolver.
// Pure, synchronous, and shared read-only across all handlers.

pub mod handlers;
pub mod resolver;
pub mod table;

use serde::{Deserialize, Serialize};

pub use resolver::{resolve, resolve_match, MatchTier, Resolution};
pub use table::{reference_table, FoodEntry};

/// Serving size stored alongside every saved prediction.
pub const SERVING_SIZE: &str = "1 serving (approx 100g)";

/// Nutrition facts for one serving. Calories in kcal, macros in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// "Average meal" estimate returned when no table entry matches.
pub const DEFAULT_RECORD: NutritionRecord = NutritionRecord {
    calories: 200,
    protein: 8.0,
    carbs: 30.0,
    fat: 6.0,
};
