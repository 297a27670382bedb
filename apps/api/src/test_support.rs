//! In-memory fakes for the injected capabilities, shared by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::classifier::{
    Classifier, ClassifierError, ClassifierStatus, ImageUpload, LabelPrediction,
};
use crate::config::Config;
use crate::errors::AppError;
use crate::images::ImageStore;
use crate::models::prediction::{FoodPredictionRow, NewFoodPrediction};
use crate::models::user::{NewUser, UserRow};
use crate::recommendation::{FoodContext, Recommendation, RecommendationEngine, Verdict};
use crate::state::AppState;
use crate::store::Store;

pub fn sample_user(email: &str) -> UserRow {
    UserRow {
        id: Uuid::new_v4(),
        name: "Ayesha".to_string(),
        email: email.to_string(),
        age: 25,
        gender: "male".to_string(),
        weight_kg: 70.0,
        height_cm: 170.0,
        activity_level: "moderately_active".to_string(),
        goal: "maintain_weight".to_string(),
        target_weight_kg: None,
        dietary_preference: "none".to_string(),
        allergies: None,
        medical_conditions: Some("diabetes".to_string()),
        daily_calorie_target: Some(2200),
        daily_protein_target: None,
        daily_carbs_target: None,
        daily_fat_target: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_prediction(email: &str, food_name: &str) -> FoodPredictionRow {
    FoodPredictionRow {
        id: Uuid::new_v4(),
        user_email: email.to_string(),
        food_name: food_name.to_string(),
        image_key: None,
        calories: 200,
        protein: 8.0,
        carbs: 30.0,
        fat: 6.0,
        confidence: 80,
        serving_size: "1 serving (approx 100g)".to_string(),
        recommendation: "moderate".to_string(),
        recommendation_reason: "ok".to_string(),
        created_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRow>>,
    predictions: Mutex<Vec<FoodPredictionRow>>,
    inserts_fail: AtomicBool,
}

impl MemoryStore {
    pub fn with_user(user: UserRow) -> Self {
        let store = Self::default();
        store.users.lock().unwrap().push(user);
        store
    }

    /// Makes every later `insert_prediction` fail like a lost connection.
    pub fn fail_inserts(&self) {
        self.inserts_fail.store(true, Ordering::SeqCst);
    }

    pub fn push_prediction(&self, p: FoodPredictionRow) {
        self.predictions.lock().unwrap().push(p);
    }

    pub fn predictions(&self) -> Vec<FoodPredictionRow> {
        self.predictions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRow, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            age: user.age,
            gender: user.gender.as_str().to_string(),
            weight_kg: user.weight_kg,
            height_cm: user.height_cm,
            activity_level: user.activity_level.as_str().to_string(),
            goal: user.goal.as_str().to_string(),
            target_weight_kg: user.target_weight_kg,
            dietary_preference: user.dietary_preference.as_str().to_string(),
            allergies: user.allergies,
            medical_conditions: user.medical_conditions,
            daily_calorie_target: None,
            daily_protein_target: None,
            daily_carbs_target: None,
            daily_fat_target: None,
            created_at: now,
            updated_at: now,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn insert_prediction(
        &self,
        p: NewFoodPrediction,
    ) -> Result<FoodPredictionRow, AppError> {
        if self.inserts_fail.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let row = FoodPredictionRow {
            id: Uuid::new_v4(),
            user_email: p.user_email,
            food_name: p.food_name,
            image_key: p.image_key,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            confidence: p.confidence,
            serving_size: p.serving_size,
            recommendation: p.recommendation,
            recommendation_reason: p.recommendation_reason,
            created_at: Utc::now(),
        };
        self.push_prediction(row.clone());
        Ok(row)
    }

    async fn recent_predictions(
        &self,
        user_email: &str,
        limit: i64,
    ) -> Result<Vec<FoodPredictionRow>, AppError> {
        let mut rows: Vec<_> = self
            .predictions
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_email == user_email)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

pub struct FakeRecommender {
    result: Option<Recommendation>,
}

impl FakeRecommender {
    pub fn fixed(r: Recommendation) -> Self {
        Self { result: Some(r) }
    }

    pub fn good() -> Self {
        Self::fixed(Recommendation {
            recommendation: Verdict::Good,
            recommendation_reason: "Fits your maintenance goal.".to_string(),
            nutritional_insights: "Balanced macros.".to_string(),
            suggestion: "Pair it with a salad.".to_string(),
        })
    }

    pub fn failing() -> Self {
        Self { result: None }
    }
}

#[async_trait]
impl RecommendationEngine for FakeRecommender {
    async fn recommend(
        &self,
        _user: &UserRow,
        _food: &FoodContext,
    ) -> Result<Recommendation, AppError> {
        self.result
            .clone()
            .ok_or_else(|| AppError::Llm("model unavailable".to_string()))
    }
}

/// Classifier that always returns the same ranked labels.
pub struct FakeClassifier {
    pub predictions: Vec<LabelPrediction>,
    calls: AtomicUsize,
}

impl FakeClassifier {
    pub fn returning(labels: &[(&str, f64)]) -> Self {
        Self {
            predictions: labels
                .iter()
                .enumerate()
                .map(|(i, (label, confidence))| LabelPrediction {
                    rank: i as u32 + 1,
                    label: label.to_string(),
                    confidence: *confidence,
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(
        &self,
        _image: &ImageUpload,
        top_k: u32,
    ) -> Result<Vec<LabelPrediction>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.predictions.is_empty() {
            return Err(ClassifierError::NoPredictions);
        }
        Ok(self
            .predictions
            .iter()
            .take(top_k as usize)
            .cloned()
            .collect())
    }

    async fn status(&self) -> Result<ClassifierStatus, ClassifierError> {
        Ok(ClassifierStatus {
            ready: true,
            classes: self.predictions.iter().map(|p| p.label.clone()).collect(),
        })
    }
}

#[derive(Default)]
pub struct MemoryImageStore {
    pub objects: Mutex<Vec<(String, Bytes, String)>>,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put_image(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .push((key.to_string(), bytes, content_type.to_string()));
        Ok(())
    }

    async fn delete_image(&self, key: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().retain(|(k, _, _)| k != key);
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/foodlens_test".to_string(),
        anthropic_api_key: "test-key".to_string(),
        classifier_url: "http://classifier.invalid".to_string(),
        classifier_top_k: 5,
        s3_bucket: "foodlens-test".to_string(),
        s3_endpoint: "http://s3.invalid".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// Handles to the fakes behind a test `AppState`.
pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub images: Arc<MemoryImageStore>,
    pub classifier: Arc<FakeClassifier>,
}

pub fn harness(
    store: MemoryStore,
    classifier: FakeClassifier,
    recommender: FakeRecommender,
) -> TestHarness {
    let store = Arc::new(store);
    let images = Arc::new(MemoryImageStore::default());
    let classifier = Arc::new(classifier);
    let state = AppState {
        store: store.clone(),
        images: images.clone(),
        classifier: classifier.clone(),
        recommender: Arc::new(recommender),
        config: test_config(),
    };
    TestHarness {
        state,
        store,
        images,
        classifier,
    }
}
