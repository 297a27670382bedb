use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::SessionUser;
use crate::classifier::{ClassifierError, ImageUpload, LabelPrediction};
use crate::errors::AppError;
use crate::images::image_key;
use crate::models::prediction::FoodPredictionRow;
use crate::predictions::service::{
    assess, load_user, persist_prediction, record_prediction, validate_prediction,
    PredictionInput, SavedPrediction,
};
use crate::predictions::summary::{
    clamp_limit, daily_totals, summarize, DailyTotals, HistorySummary,
};
use crate::state::AppState;

/// Largest accepted photo upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct SavePredictionRequest {
    pub food_name: String,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub predictions: Vec<FoodPredictionRow>,
    pub summary: HistorySummary,
    pub today: DailyTotals,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    /// All ranked labels; the first one was saved.
    pub predictions: Vec<LabelPrediction>,
    #[serde(flatten)]
    pub saved: SavedPrediction,
}

/// POST /api/v1/predictions
///
/// Saves a classification made elsewhere, with nutrition and a recommendation.
pub async fn handle_save_prediction(
    State(state): State<AppState>,
    session: SessionUser,
    Json(req): Json<SavePredictionRequest>,
) -> Result<(StatusCode, Json<SavedPrediction>), AppError> {
    let saved = record_prediction(
        state.store.as_ref(),
        state.recommender.as_ref(),
        PredictionInput {
            user_email: &session.email,
            food_name: &req.food_name,
            confidence: req.confidence,
            image_key: None,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/predictions?limit=N
///
/// Most recent predictions with a summary and today's totals.
pub async fn handle_list_predictions(
    State(state): State<AppState>,
    session: SessionUser,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let predictions = state
        .store
        .recent_predictions(&session.email, clamp_limit(params.limit))
        .await?;

    let summary = summarize(&predictions);
    let today = daily_totals(&predictions, Utc::now().date_naive());

    Ok(Json(HistoryResponse {
        predictions,
        summary,
        today,
    }))
}

/// POST /api/v1/classify
///
/// Multipart photo upload (`image` or `file` field). Classifies the photo and
/// records the top-ranked label. The photo is stored only once the profile
/// exists and the recommendation has succeeded, and is removed again if the
/// prediction row cannot be written.
pub async fn handle_classify(
    State(state): State<AppState>,
    session: SessionUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ClassifyResponse>), AppError> {
    let upload = read_image_field(multipart).await?;
    let user = load_user(state.store.as_ref(), &session.email).await?;

    let predictions = state
        .classifier
        .classify(&upload, state.config.classifier_top_k)
        .await?;
    let top = predictions
        .first()
        .cloned()
        .ok_or(ClassifierError::NoPredictions)?;
    info!(
        "Classified upload from {} as '{}' ({:.1}%)",
        session.email, top.label, top.confidence
    );

    validate_prediction(&top.label, top.confidence)?;
    let assessment = assess(
        state.recommender.as_ref(),
        &user,
        &top.label,
        top.confidence,
    )
    .await?;

    let key = image_key(&session.email, &upload.content_type);
    state
        .images
        .put_image(&key, upload.bytes.clone(), &upload.content_type)
        .await?;

    let saved = persist_prediction(
        state.store.as_ref(),
        &user,
        PredictionInput {
            user_email: &session.email,
            food_name: &top.label,
            confidence: top.confidence,
            image_key: Some(key.clone()),
        },
        assessment,
    )
    .await;

    let saved = match saved {
        Ok(saved) => saved,
        Err(e) => {
            if let Err(cleanup) = state.images.delete_image(&key).await {
                warn!("Could not remove unsaved photo {key}: {cleanup}");
            }
            return Err(e);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ClassifyResponse { predictions, saved }),
    ))
}

async fn read_image_field(mut multipart: Multipart) -> Result<ImageUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if !matches!(field.name(), Some("image") | Some("file")) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::Validation(
                "Please select a valid image file".to_string(),
            ));
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Image file is empty".to_string()));
        }

        return Ok(ImageUpload {
            bytes,
            file_name,
            content_type,
        });
    }

    Err(AppError::Validation(
        "Please select an image first".to_string(),
    ))
}
