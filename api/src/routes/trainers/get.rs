use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::trainer_review::Model as TrainerReview;
use db::models::user::{Model as User, Role};

/// A trainer profile enriched with review aggregates.
#[derive(Debug, Serialize)]
pub struct TrainerResponse {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_reviews: usize,
    pub average_rating: Option<f64>,
}

impl TrainerResponse {
    fn new(trainer: &User, reviews: &[TrainerReview]) -> Self {
        let (total_reviews, average_rating) = TrainerReview::aggregate(reviews);
        Self {
            id: trainer.id,
            email: trainer.email.clone(),
            username: trainer.username.clone(),
            role: trainer.role,
            profile_image: trainer.profile_image.clone(),
            created_at: trainer.created_at,
            updated_at: trainer.updated_at,
            total_reviews,
            average_rating,
        }
    }
}

/// GET /api/trainers
///
/// Public trainer directory, newest first, with per-trainer review totals
/// and average rating.
pub async fn list_trainers(State(app_state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    let trainers = User::find_by_role(db, Role::Trainer)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch trainers.", e))?;

    let mut formatted = Vec::with_capacity(trainers.len());
    for trainer in &trainers {
        let reviews = TrainerReview::find_for_trainer(db, trainer.id)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch trainers.", e))?;
        formatted.push(TrainerResponse::new(trainer, &reviews));
    }

    Ok(Json(ApiResponse::success(formatted, "Trainers fetched")))
}

/// GET /api/trainers/{trainer_id}
///
/// ### Responses
/// - `200 OK` with the trainer profile
/// - `404 Not Found` ("Trainer not found.") — also for users that exist
///   but are not trainers
pub async fn get_trainer_by_id(
    State(app_state): State<AppState>,
    Path(trainer_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    let trainer = User::find_by_id(db, trainer_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch trainer.", e))?
        .filter(|u| u.role == Role::Trainer)
        .ok_or_else(|| ApiError::NotFound("Trainer not found.".into()))?;

    let reviews = TrainerReview::find_for_trainer(db, trainer.id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch trainer.", e))?;

    Ok(Json(ApiResponse::success(
        TrainerResponse::new(&trainer, &reviews),
        "Trainer fetched",
    )))
}
