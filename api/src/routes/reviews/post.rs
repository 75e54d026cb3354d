use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::auth::extractors::extract_bearer_token;
use crate::auth::verify_jwt;
use crate::response::{ApiError, ApiResponse};
use crate::routes::reviews::common::build_review_response;
use crate::state::AppState;
use db::models::trainer_review::Model as TrainerReview;
use db::models::user::{Model as User, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub trainer_id: Option<i64>,
    pub comment: Option<String>,
    pub rating: Option<i32>,
}

/// POST /api/reviews
///
/// Leave a review for a trainer. The reviewer identity comes from the
/// bearer token, extracted manually here rather than via a route gate, so
/// client-supplied reviewer IDs are never trusted.
///
/// ### Responses
/// - `201 Created` with the review
/// - `400 Bad Request` (missing fields, rating outside 1..=5)
/// - `401 Unauthorized` (missing/invalid token)
/// - `404 Not Found` (reviewer gone, or target not a trainer)
pub async fn create_review(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::Authentication("Missing authorization token.".into()))?;
    let claims =
        verify_jwt(&token).map_err(|_| ApiError::Authentication("Invalid token.".into()))?;

    let (Some(trainer_id), Some(comment)) = (req.trainer_id, req.comment.as_deref()) else {
        return Err(ApiError::Validation(
            "trainerId and comment are required.".into(),
        ));
    };
    if comment.trim().is_empty() {
        return Err(ApiError::Validation(
            "trainerId and comment are required.".into(),
        ));
    }
    if let Some(rating) = req.rating {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::Validation("rating must be between 1 and 5.".into()));
        }
    }

    let db = app_state.db();

    let reviewer = User::find_by_id(db, claims.sub)
        .await
        .map_err(|e| ApiError::internal("Failed to create review.", e))?
        .ok_or_else(|| ApiError::NotFound("Reviewer not found.".into()))?;

    let trainer = User::find_by_id(db, trainer_id)
        .await
        .map_err(|e| ApiError::internal("Failed to create review.", e))?
        .filter(|u| u.role == Role::Trainer)
        .ok_or_else(|| {
            ApiError::NotFound("Trainer not found or not eligible for reviews.".into())
        })?;

    let review = TrainerReview::create(db, reviewer.id, trainer.id, comment, req.rating)
        .await
        .map_err(|e| ApiError::internal("Failed to create review.", e))?;

    let response = build_review_response(db, review)
        .await
        .map_err(|e| ApiError::internal("Failed to create review.", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(response, "Review created successfully")),
    ))
}
