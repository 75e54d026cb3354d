use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use sea_orm::{Iterable, QueryOrder};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::classes::common::{ClassResponse, UserSummary, build_class_response};
use crate::state::AppState;
use db::models::class::Model as Class;
use db::models::class_enrollment::Model as ClassEnrollment;
use db::models::user::{self, Model as User, Role};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub profile_image: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            profile_image: user.profile_image.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// GET /api/users?role=TRAINER
///
/// Admin-only listing, newest first, optionally filtered by role. The
/// admin role is asserted against the current database row.
pub async fn list_users(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    require_current_admin(db, claims.sub, "Only admins can view users.").await?;

    let filter_role = match query.role.as_deref() {
        Some(raw) => {
            Some(Role::from_str(raw).map_err(|_| ApiError::Validation("Invalid role.".into()))?)
        }
        None => None,
    };

    let mut select = user::Entity::find();
    if let Some(role) = filter_role {
        select = select.filter(user::Column::Role.eq(role));
    }
    let users = select
        .order_by_desc(user::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch users.", e))?;

    let profiles: Vec<UserProfileResponse> = users.iter().map(UserProfileResponse::from).collect();
    Ok(Json(ApiResponse::success(profiles, "Users fetched")))
}

/// GET /api/users/roles
///
/// The closed set of assignable roles.
pub async fn list_user_roles() -> impl IntoResponse {
    let roles: Vec<Role> = Role::iter().collect();
    Json(ApiResponse::success(roles, "Roles fetched"))
}

/// GET /api/users/{user_id}
pub async fn get_user_profile(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = User::find_by_id(app_state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to get user profile.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    Ok(Json(ApiResponse::success(
        UserProfileResponse::from(&user),
        "Profile fetched",
    )))
}

/// Lifecycle position of an enrollment relative to the clock.
#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Upcoming,
    Ongoing,
    Ended,
}

#[derive(Debug, Serialize)]
pub struct EnrolledClassEntry {
    pub enrollment_id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub has_started: bool,
    pub status: EnrollmentStatus,
    pub class: ClassResponse,
}

#[derive(Debug, Serialize)]
pub struct EnrolledClassesResponse {
    pub user: UserSummary,
    pub enrollments: Vec<EnrolledClassEntry>,
}

/// GET /api/users/{user_id}/classes
///
/// The user's booked classes, most recent booking first, each tagged with
/// its lifecycle status.
pub async fn get_user_enrolled_classes(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    let user = User::find_by_id(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch user classes.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    let enrollments = ClassEnrollment::find_for_user(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch user classes.", e))?;

    let now = Utc::now();
    let mut entries = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let Some(class) = Class::find_by_id(db, enrollment.class_id)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch user classes.", e))?
        else {
            continue;
        };

        let status = if class.start_time > now {
            EnrollmentStatus::Upcoming
        } else if class.end_time < now {
            EnrollmentStatus::Ended
        } else {
            EnrollmentStatus::Ongoing
        };

        entries.push(EnrolledClassEntry {
            enrollment_id: enrollment.id,
            enrolled_at: enrollment.created_at,
            has_started: now >= class.start_time,
            status,
            class: build_class_response(db, class)
                .await
                .map_err(|e| ApiError::internal("Failed to fetch user classes.", e))?,
        });
    }

    Ok(Json(ApiResponse::success(
        EnrolledClassesResponse {
            user: UserSummary::from(&user),
            enrollments: entries,
        },
        "Enrollments fetched",
    )))
}
