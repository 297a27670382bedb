//! Food image classification behind a pluggable trait.
//!
//! `HttpClassifier` talks to the hosted model server:
//! - `POST {base}/predict?top_k=N` (multipart field `file`) →
//!   `{"success": bool, "predictions": [{"rank", "class", "confidence"}], "detail"?}`
//! - `GET {base}/health` → `{"status": "healthy", "model_loaded": bool}`
//! - `GET {base}/classes` → `{"classes": [..]}`
//!
//! Some deployments mount the server under `/api`. When `{base}/health` is
//! unreachable or not 2xx, `{base}/api/health` is tried, and a root that
//! answers there is used for every later call.
//!
//! Confidence is a percentage in `[0, 100]`.

pub mod handlers;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("prediction failed: {0}")]
    Rejected(String),

    #[error("no predictions returned from model")]
    NoPredictions,
}

/// One ranked label from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPrediction {
    pub rank: u32,
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
}

/// Uploaded photo handed to the classifier.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierStatus {
    pub ready: bool,
    pub classes: Vec<String>,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Returns up to `top_k` labels, best first.
    async fn classify(
        &self,
        image: &ImageUpload,
        top_k: u32,
    ) -> Result<Vec<LabelPrediction>, ClassifierError>;

    async fn status(&self) -> Result<ClassifierStatus, ClassifierError>;
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    success: bool,
    #[serde(default)]
    predictions: Vec<LabelPrediction>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    #[serde(default)]
    model_loaded: bool,
}

#[derive(Debug, Deserialize)]
struct ClassesResponse {
    #[serde(default)]
    classes: Vec<String>,
}

pub struct HttpClassifier {
    client: Client,
    base_url: String,
    /// Root the server answered on: `base_url` or `{base_url}/api`.
    root: RwLock<String>,
}

impl HttpClassifier {
    pub fn new(base_url: String) -> Result<Self, ClassifierError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            root: RwLock::new(base_url.clone()),
            base_url,
        })
    }

    async fn root(&self) -> String {
        self.root.read().await.clone()
    }

    async fn fetch_health(&self) -> Result<HealthResponse, ClassifierError> {
        let [plain, prefixed] = health_roots(&self.base_url);

        let health = match self.get_health(&plain).await {
            Ok(h) => {
                *self.root.write().await = plain;
                h
            }
            Err(e) => {
                debug!("Classifier health at {plain} failed ({e}), trying {prefixed}");
                let h = self.get_health(&prefixed).await?;
                *self.root.write().await = prefixed;
                h
            }
        };
        Ok(health)
    }

    async fn get_health(&self, root: &str) -> Result<HealthResponse, ClassifierError> {
        Ok(self
            .client
            .get(format!("{root}/health"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn fetch_classes(&self) -> Result<Vec<String>, ClassifierError> {
        let response = self
            .client
            .get(format!("{}/classes", self.root().await))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<ClassesResponse>().await?.classes)
    }
}

/// Candidate server roots, in the order they are probed.
fn health_roots(base_url: &str) -> [String; 2] {
    let base = base_url.trim_end_matches('/');
    [base.to_string(), format!("{base}/api")]
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        image: &ImageUpload,
        top_k: u32,
    ) -> Result<Vec<LabelPrediction>, ClassifierError> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/predict", self.root().await))
            .query(&[("top_k", top_k)])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PredictResponse = response.json().await?;
        let predictions = ranked_predictions(body)?;
        debug!(
            "Classifier returned {} labels, top: {}",
            predictions.len(),
            predictions[0].label
        );
        Ok(predictions)
    }

    async fn status(&self) -> Result<ClassifierStatus, ClassifierError> {
        let health = self.fetch_health().await?;

        let ready = health.status == "healthy" && health.model_loaded;
        if !ready {
            return Ok(ClassifierStatus {
                ready,
                classes: vec![],
            });
        }

        // The class list is informational; readiness does not depend on it.
        let classes = match self.fetch_classes().await {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not fetch classifier classes: {e}");
                vec![]
            }
        };
        Ok(ClassifierStatus { ready, classes })
    }
}

/// Validates a predict response and orders its labels by rank.
fn ranked_predictions(body: PredictResponse) -> Result<Vec<LabelPrediction>, ClassifierError> {
    if !body.success {
        return Err(ClassifierError::Rejected(
            body.detail.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }
    let mut predictions = body.predictions;
    if predictions.is_empty() {
        return Err(ClassifierError::NoPredictions);
    }
    predictions.sort_by_key(|p| p.rank);
    Ok(predictions)
}
