use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::response::{ApiError, ApiResponse};
use crate::routes::reviews::common::{ReviewResponse, ReviewUser, build_review_response};
use crate::state::AppState;
use db::models::trainer_review::Model as TrainerReview;
use db::models::user::{Model as User, Role};

/// GET /api/reviews
///
/// Every review on the platform, newest first.
pub async fn list_reviews(State(app_state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    let reviews = TrainerReview::find_all(db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch reviews.", e))?;

    let mut formatted = Vec::with_capacity(reviews.len());
    for review in reviews {
        formatted.push(
            build_review_response(db, review)
                .await
                .map_err(|e| ApiError::internal("Failed to fetch reviews.", e))?,
        );
    }

    Ok(Json(ApiResponse::success(formatted, "Reviews fetched")))
}

#[derive(Debug, Serialize)]
pub struct ReviewSummaryResponse {
    pub total_reviews: usize,
    pub average_rating: Option<f64>,
    /// How many reviews carry each star value.
    pub rating_counts: BTreeMap<i32, usize>,
}

/// GET /api/reviews/summary
///
/// Platform-wide aggregates for the landing page.
pub async fn get_review_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    let reviews = TrainerReview::find_all(db)
        .await
        .map_err(|e| ApiError::internal("Failed to summarize reviews.", e))?;

    let (total_reviews, average_rating) = TrainerReview::aggregate(&reviews);
    let mut rating_counts = BTreeMap::new();
    for rating in reviews.iter().filter_map(|r| r.rating) {
        *rating_counts.entry(rating).or_insert(0) += 1;
    }

    Ok(Json(ApiResponse::success(
        ReviewSummaryResponse {
            total_reviews,
            average_rating,
            rating_counts,
        },
        "Review summary fetched",
    )))
}

#[derive(Debug, Serialize)]
pub struct TrainerReviewsResponse {
    pub trainer: ReviewUser,
    pub total_reviews: usize,
    pub average_rating: Option<f64>,
    pub reviews: Vec<ReviewResponse>,
}

/// GET /api/reviews/trainer/{trainer_id}
///
/// All reviews for one trainer plus their aggregates.
pub async fn get_trainer_reviews(
    State(app_state): State<AppState>,
    Path(trainer_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    let trainer = User::find_by_id(db, trainer_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch trainer reviews.", e))?
        .filter(|u| u.role == Role::Trainer)
        .ok_or_else(|| {
            ApiError::NotFound("Trainer not found or not eligible for reviews.".into())
        })?;

    let reviews = TrainerReview::find_for_trainer(db, trainer_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch trainer reviews.", e))?;
    let (total_reviews, average_rating) = TrainerReview::aggregate(&reviews);

    let mut formatted = Vec::with_capacity(reviews.len());
    for review in reviews {
        formatted.push(
            build_review_response(db, review)
                .await
                .map_err(|e| ApiError::internal("Failed to fetch trainer reviews.", e))?,
        );
    }

    Ok(Json(ApiResponse::success(
        TrainerReviewsResponse {
            trainer: ReviewUser::from(&trainer),
            total_reviews,
            average_rating,
            reviews: formatted,
        },
        "Trainer reviews fetched",
    )))
}
