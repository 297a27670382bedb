use axum::{extract::State, Json};

use crate::classifier::ClassifierStatus;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/classifier/status
///
/// Whether the model server is up with its model loaded, plus its class list.
pub async fn handle_classifier_status(
    State(state): State<AppState>,
) -> Result<Json<ClassifierStatus>, AppError> {
    Ok(Json(state.classifier.status().await?))
}
