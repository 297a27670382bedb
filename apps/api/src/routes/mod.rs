pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::classifier::handlers as classifier;
use crate::nutrition::handlers as nutrition;
use crate::predictions::handlers::{self as predictions, MAX_UPLOAD_BYTES};
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Reference table
        .route("/api/v1/nutrition", get(nutrition::handle_list_foods))
        .route("/api/v1/nutrition/:label", get(nutrition::handle_lookup))
        .route(
            "/api/v1/classifier/status",
            get(classifier::handle_classifier_status),
        )
        // Profile
        .route("/api/v1/users", post(profile::handle_register))
        .route("/api/v1/users/me", get(profile::handle_get_profile))
        // Predictions
        .route(
            "/api/v1/predictions",
            post(predictions::handle_save_prediction).get(predictions::handle_list_predictions),
        )
        .route(
            "/api/v1/classify",
            post(predictions::handle_classify).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}
