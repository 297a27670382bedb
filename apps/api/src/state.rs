use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::images::ImageStore;
use crate::recommendation::RecommendationEngine;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
/// External capabilities are trait objects so handlers run against fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub images: Arc<dyn ImageStore>,
    pub classifier: Arc<dyn Classifier>,
    pub recommender: Arc<dyn RecommendationEngine>,
    pub config: Config,
}
