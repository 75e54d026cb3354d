use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::routes::classes::common::{
    ClassResponse, EnrollmentEntry, UserSummary, build_class_response, build_enrollment_entries,
};
use crate::state::AppState;
use db::models::class::Model as Class;
use db::models::class_enrollment::Model as ClassEnrollment;
use db::models::user::{Model as User, Role};

/// GET /api/classes
///
/// Full catalog, soonest first, each entry carrying enrollment count and
/// remaining seats.
pub async fn list_classes(State(app_state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    let classes = Class::find_all(db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch classes.", e))?;

    let mut formatted = Vec::with_capacity(classes.len());
    for class in classes {
        formatted.push(
            build_class_response(db, class)
                .await
                .map_err(|e| ApiError::internal("Failed to fetch classes.", e))?,
        );
    }

    Ok(Json(ApiResponse::success(formatted, "Classes fetched")))
}

/// GET /api/classes/upcoming
///
/// Only classes whose start time is still in the future.
pub async fn list_upcoming_classes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    let classes = Class::find_upcoming(db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch upcoming classes.", e))?;

    let mut formatted = Vec::with_capacity(classes.len());
    for class in classes {
        formatted.push(
            build_class_response(db, class)
                .await
                .map_err(|e| ApiError::internal("Failed to fetch upcoming classes.", e))?,
        );
    }

    Ok(Json(ApiResponse::success(formatted, "Upcoming classes fetched")))
}

#[derive(Debug, Serialize)]
pub struct ClassDetailResponse {
    #[serde(flatten)]
    pub class: ClassResponse,
    pub enrollments: Vec<EnrollmentEntry>,
}

/// GET /api/classes/{class_id}
///
/// One class with its full roster.
pub async fn get_class_by_id(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    let class = Class::find_by_id(db, class_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch class.", e))?
        .ok_or_else(|| ApiError::NotFound("Class not found.".into()))?;

    let enrollments = ClassEnrollment::find_for_class(db, class_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch class.", e))?;

    let detail = ClassDetailResponse {
        class: build_class_response(db, class)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch class.", e))?,
        enrollments: build_enrollment_entries(db, enrollments)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch class.", e))?,
    };

    Ok(Json(ApiResponse::success(detail, "Class fetched")))
}

#[derive(Debug, Serialize)]
pub struct ClassEnrollmentsResponse {
    pub class: ClassResponse,
    pub enrollments: Vec<EnrollmentEntry>,
}

/// GET /api/classes/{class_id}/enrollments
///
/// Roster for one class with user summaries, oldest enrollment first.
pub async fn list_class_enrollments(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    let class = Class::find_by_id(db, class_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch class enrollments.", e))?
        .ok_or_else(|| ApiError::NotFound("Class not found.".into()))?;

    let enrollments = ClassEnrollment::find_for_class(db, class_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch class enrollments.", e))?;

    let response = ClassEnrollmentsResponse {
        class: build_class_response(db, class)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch class enrollments.", e))?,
        enrollments: build_enrollment_entries(db, enrollments)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch class enrollments.", e))?,
    };

    Ok(Json(ApiResponse::success(response, "Enrollments fetched")))
}

#[derive(Debug, Serialize)]
pub struct TrainerClassesResponse {
    pub trainer: UserSummary,
    pub classes: Vec<ClassResponse>,
}

/// GET /api/classes/trainer/{trainer_id}
///
/// Schedule of one trainer. A trainer bearer may only look at their own
/// schedule; everyone else sees any trainer.
pub async fn list_trainer_classes(
    State(app_state): State<AppState>,
    auth: Option<AuthUser>,
    Path(trainer_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    let trainer = User::find_by_id(db, trainer_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch trainer classes.", e))?
        .filter(|u| u.role == Role::Trainer)
        .ok_or_else(|| ApiError::NotFound("Trainer not found.".into()))?;

    if let Some(AuthUser(claims)) = &auth {
        if claims.role == Role::Trainer && claims.sub != trainer_id {
            return Err(ApiError::Authorization(
                "You can only view your own classes.".into(),
            ));
        }
    }

    let classes = Class::find_by_trainer(db, trainer_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch trainer classes.", e))?;

    let mut formatted = Vec::with_capacity(classes.len());
    for class in classes {
        formatted.push(
            build_class_response(db, class)
                .await
                .map_err(|e| ApiError::internal("Failed to fetch trainer classes.", e))?,
        );
    }

    Ok(Json(ApiResponse::success(
        TrainerClassesResponse {
            trainer: UserSummary::from(&trainer),
            classes: formatted,
        },
        "Trainer classes fetched",
    )))
}

/// GET /api/classes/mine
///
/// The authenticated trainer's own schedule. The role check runs against
/// the current user row, so a revoked trainer loses access immediately.
pub async fn get_my_classes(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    let trainer = User::find_by_id(db, claims.sub)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch my classes.", e))?
        .filter(|u| u.role == Role::Trainer)
        .ok_or_else(|| ApiError::Authorization("Only trainers can view their classes.".into()))?;

    let classes = Class::find_by_trainer(db, trainer.id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch my classes.", e))?;

    let mut formatted = Vec::with_capacity(classes.len());
    for class in classes {
        formatted.push(
            build_class_response(db, class)
                .await
                .map_err(|e| ApiError::internal("Failed to fetch my classes.", e))?,
        );
    }

    Ok(Json(ApiResponse::success(
        TrainerClassesResponse {
            trainer: UserSummary::from(&trainer),
            classes: formatted,
        },
        "My classes fetched",
    )))
}
