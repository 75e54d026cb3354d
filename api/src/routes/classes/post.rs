use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::classes::common::build_class_response;
use crate::state::AppState;
use db::models::class::{Model as Class, NewClass};
use db::models::class_category::Model as ClassCategory;
use db::models::class_enrollment::{EnrollmentError, Model as ClassEnrollment};
use db::models::user::{Model as User, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub trainer_id: Option<i64>,
    pub category_id: Option<i64>,
    pub required_role: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub capacity: Option<i32>,
}

/// Parses a membership-role restriction from a request. Staff roles are
/// not valid restrictions.
pub(super) fn parse_required_role(value: &str) -> Result<Role, ApiError> {
    Role::from_str(value)
        .ok()
        .filter(Role::is_membership)
        .ok_or_else(|| {
            ApiError::Validation(
                "requiredRole must be one of USER, USER_BRONZE, USER_GOLD, USER_PLATINUM if provided."
                    .into(),
            )
        })
}

pub(super) fn parse_time(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ApiError::Validation("startTime and endTime must be valid dates.".into()))
}

/// POST /api/classes
///
/// Create a new class. Only accessible by admin users; the admin role is
/// re-checked against the database before the insert.
///
/// ### Request Body
/// ```json
/// {
///   "trainerId": 7,
///   "categoryId": 2,
///   "requiredRole": "USER_GOLD",
///   "title": "Evening HIIT",
///   "description": "45 minutes, bring a towel",
///   "startTime": "2026-02-01T18:00:00Z",
///   "endTime": "2026-02-01T18:45:00Z",
///   "capacity": 20
/// }
/// ```
///
/// ### Validation Rules
/// * `trainerId`, `title`, `startTime`, `endTime`: required
/// * `trainerId` must reference a TRAINER user
/// * `categoryId`, when given, must reference an existing category
/// * `endTime` must be after `startTime`
/// * `capacity`, when given, must be positive
/// * `requiredRole`, when given, must be a membership role
pub async fn create_class(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(trainer_id), Some(title), Some(start_time), Some(end_time)) = (
        req.trainer_id,
        req.title.as_deref(),
        req.start_time.as_deref(),
        req.end_time.as_deref(),
    ) else {
        return Err(ApiError::Validation(
            "trainerId, title, startTime, and endTime are required.".into(),
        ));
    };

    let required_role = req
        .required_role
        .as_deref()
        .map(parse_required_role)
        .transpose()?;

    let start = parse_time(start_time)?;
    let end = parse_time(end_time)?;
    if end <= start {
        return Err(ApiError::Validation("endTime must be after startTime.".into()));
    }

    if let Some(capacity) = req.capacity {
        if capacity <= 0 {
            return Err(ApiError::Validation(
                "capacity must be greater than zero if provided.".into(),
            ));
        }
    }

    let db = app_state.db();
    let admin = require_current_admin(db, claims.sub, "Only admins can create classes.").await?;

    let trainer = User::find_by_id(db, trainer_id)
        .await
        .map_err(|e| ApiError::internal("Failed to create class.", e))?
        .filter(|u| u.role == Role::Trainer)
        .ok_or_else(|| ApiError::Validation("trainerId must reference a trainer user.".into()))?;

    let category_id = match req.category_id {
        Some(category_id) => {
            let category = ClassCategory::find_by_id(db, category_id)
                .await
                .map_err(|e| ApiError::internal("Failed to create class.", e))?;
            if category.is_none() {
                return Err(ApiError::Validation(
                    "categoryId must reference an existing category.".into(),
                ));
            }
            Some(category_id)
        }
        None => None,
    };

    let class = Class::create(
        db,
        NewClass {
            title: title.to_owned(),
            description: req.description,
            start_time: start,
            end_time: end,
            capacity: req.capacity,
            required_role,
            created_by_id: admin.id,
            trainer_id: trainer.id,
            category_id,
        },
    )
    .await
    .map_err(|e| ApiError::internal("Failed to create class.", e))?;

    let response = build_class_response(db, class)
        .await
        .map_err(|e| ApiError::internal("Failed to create class.", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(response, "Class created successfully")),
    ))
}

/// POST /api/classes/{class_id}/enroll
///
/// Enrolls the authenticated user. The start-time, capacity, and tier
/// gates (and the duplicate check) are enforced transactionally by the
/// model layer; this handler only translates the outcome.
pub async fn enroll_in_class(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(class_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    match ClassEnrollment::enroll(db, class_id, claims.sub).await {
        Ok(enrollment) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(enrollment, "Enrolled successfully")),
        )),
        Err(e) => Err(map_enrollment_error(e)),
    }
}

fn map_enrollment_error(err: EnrollmentError) -> ApiError {
    match err {
        EnrollmentError::ClassNotFound | EnrollmentError::UserNotFound => {
            ApiError::NotFound(err.to_string())
        }
        EnrollmentError::ClassStarted | EnrollmentError::ClassFull => {
            ApiError::Validation(err.to_string())
        }
        EnrollmentError::RoleMismatch(_) => ApiError::Authorization(err.to_string()),
        EnrollmentError::AlreadyEnrolled => ApiError::Conflict(err.to_string()),
        EnrollmentError::Db(e) => ApiError::internal("Failed to enroll in class.", e),
    }
}
