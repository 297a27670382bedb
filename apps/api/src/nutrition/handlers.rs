use axum::{extract::Path, Json};
use serde::Serialize;

use crate::nutrition::{reference_table, resolve_match, NutritionRecord, Resolution};

#[derive(Debug, Serialize)]
pub struct FoodEntryView {
    pub label: &'static str,
    #[serde(flatten)]
    pub nutrition: NutritionRecord,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub label: String,
    #[serde(flatten)]
    pub resolution: Resolution,
}

/// GET /api/v1/nutrition
pub async fn handle_list_foods() -> Json<Vec<FoodEntryView>> {
    Json(
        reference_table()
            .iter()
            .map(|e| FoodEntryView {
                label: e.label,
                nutrition: e.record,
            })
            .collect(),
    )
}

/// GET /api/v1/nutrition/:label
///
/// Always 200: unknown labels get the default record with tier `default`.
pub async fn handle_lookup(Path(label): Path<String>) -> Json<LookupResponse> {
    let resolution = resolve_match(&label);
    Json(LookupResponse { label, resolution })
}
