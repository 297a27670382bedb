use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::SessionUser;
use crate::errors::AppError;
use crate::models::user::{
    ActivityLevel, DietaryPreference, Gender, Goal, NewUser, UserRow,
};
use crate::profile::metrics::{compute_energy_metrics, BodyProfile, EnergyMetrics};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    pub target_weight_kg: Option<f64>,
    #[serde(default)]
    pub dietary_preference: DietaryPreference,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserRow,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserRow,
    pub metrics: EnergyMetrics,
}

/// POST /api/v1/users
///
/// Registers the profile of the signed-in user. 409 if it already exists.
pub async fn handle_register(
    State(state): State<AppState>,
    session: SessionUser,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    validate_registration(&req)?;

    if state.store.find_user_by_email(&session.email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let user = state
        .store
        .create_user(NewUser {
            name: req.name.trim().to_string(),
            email: session.email,
            age: req.age,
            gender: req.gender,
            weight_kg: req.weight_kg,
            height_cm: req.height_cm,
            activity_level: req.activity_level,
            goal: req.goal,
            target_weight_kg: req.target_weight_kg,
            dietary_preference: req.dietary_preference,
            allergies: non_blank(req.allergies),
            medical_conditions: non_blank(req.medical_conditions),
        })
        .await?;

    info!("Registered profile for {}", user.email);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// GET /api/v1/users/me
///
/// Returns the stored profile with BMI, BMR and TDEE.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state
        .store
        .find_user_by_email(&session.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let metrics = compute_energy_metrics(&body_profile(&user)?);
    Ok(Json(ProfileResponse { user, metrics }))
}

/// Builds the metrics input from a stored row. An unrecognised activity level
/// falls back to the default multiplier; an unrecognised gender is corrupt data.
pub fn body_profile(user: &UserRow) -> Result<BodyProfile, AppError> {
    let gender = user
        .gender
        .parse::<Gender>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("user {}: {e}", user.id)))?;

    Ok(BodyProfile {
        age: user.age,
        gender,
        weight_kg: user.weight_kg,
        height_cm: user.height_cm,
        activity_level: user.activity_level.parse::<ActivityLevel>().ok(),
    })
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if !(1..=120).contains(&req.age) {
        return Err(AppError::Validation(
            "age must be between 1 and 120".to_string(),
        ));
    }
    if !(req.weight_kg > 0.0 && req.weight_kg <= 500.0) {
        return Err(AppError::Validation(
            "weight_kg must be between 0 and 500".to_string(),
        ));
    }
    if !(req.height_cm > 0.0 && req.height_cm <= 300.0) {
        return Err(AppError::Validation(
            "height_cm must be between 0 and 300".to_string(),
        ));
    }
    if let Some(target) = req.target_weight_kg {
        if !(target > 0.0 && target <= 500.0) {
            return Err(AppError::Validation(
                "target_weight_kg must be between 0 and 500".to_string(),
            ));
        }
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
