//! Persistence capability. Handlers only see `dyn Store`; `PgStore` is the
//! PostgreSQL implementation wired in `main`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::prediction::{FoodPredictionRow, NewFoodPrediction};
use crate::models::user::{NewUser, UserRow};

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError>;

    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<UserRow, AppError>;

    async fn insert_prediction(
        &self,
        prediction: NewFoodPrediction,
    ) -> Result<FoodPredictionRow, AppError>;

    /// Most recent first.
    async fn recent_predictions(
        &self,
        user_email: &str,
        limit: i64,
    ) -> Result<Vec<FoodPredictionRow>, AppError>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1 LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRow, AppError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (id, name, email, age, gender, weight_kg, height_cm, activity_level,
                 goal, target_weight_kg, dietary_preference, allergies, medical_conditions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.gender.as_str())
        .bind(user.weight_kg)
        .bind(user.height_cm)
        .bind(user.activity_level.as_str())
        .bind(user.goal.as_str())
        .bind(user.target_weight_kg)
        .bind(user.dietary_preference.as_str())
        .bind(&user.allergies)
        .bind(&user.medical_conditions)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                info!("Created user {} ({})", row.id, row.email);
                Ok(row)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_prediction(
        &self,
        p: NewFoodPrediction,
    ) -> Result<FoodPredictionRow, AppError> {
        let row = sqlx::query_as::<_, FoodPredictionRow>(
            r#"
            INSERT INTO food_predictions
                (id, user_email, food_name, image_key, calories, protein, carbs, fat,
                 confidence, serving_size, recommendation, recommendation_reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&p.user_email)
        .bind(&p.food_name)
        .bind(&p.image_key)
        .bind(p.calories)
        .bind(p.protein)
        .bind(p.carbs)
        .bind(p.fat)
        .bind(p.confidence)
        .bind(&p.serving_size)
        .bind(&p.recommendation)
        .bind(&p.recommendation_reason)
        .fetch_one(&self.pool)
        .await?;

        info!("Saved prediction {} ({}) for {}", row.id, row.food_name, row.user_email);
        Ok(row)
    }

    async fn recent_predictions(
        &self,
        user_email: &str,
        limit: i64,
    ) -> Result<Vec<FoodPredictionRow>, AppError> {
        Ok(sqlx::query_as::<_, FoodPredictionRow>(
            r#"
            SELECT * FROM food_predictions
            WHERE user_email = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_email)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
