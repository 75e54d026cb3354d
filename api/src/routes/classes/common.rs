use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

use db::models::class::Model as Class;
use db::models::class_category::Model as ClassCategory;
use db::models::class_enrollment::Model as ClassEnrollment;
use db::models::user::{Model as User, Role};

/// Public projection of a user row (never exposes the password hash or
/// reset-token fields).
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// A class enriched with its relations and seat accounting.
#[derive(Debug, Serialize)]
pub struct ClassResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub required_role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<UserSummary>,
    pub trainer: Option<UserSummary>,
    pub category: Option<ClassCategory>,
    pub enrollment_count: u64,
    pub available_spots: Option<i64>,
}

/// Loads the trainer, creator, category, and enrollment count for a class.
pub async fn build_class_response(
    db: &DatabaseConnection,
    class: Class,
) -> Result<ClassResponse, DbErr> {
    let enrollment_count = class.enrollment_count(db).await?;
    let available_spots = class.available_spots(enrollment_count);

    let trainer = User::find_by_id(db, class.trainer_id)
        .await?
        .map(|u| UserSummary::from(&u));
    let created_by = User::find_by_id(db, class.created_by_id)
        .await?
        .map(|u| UserSummary::from(&u));
    let category = match class.category_id {
        Some(category_id) => ClassCategory::find_by_id(db, category_id).await?,
        None => None,
    };

    Ok(ClassResponse {
        id: class.id,
        title: class.title,
        description: class.description,
        start_time: class.start_time,
        end_time: class.end_time,
        capacity: class.capacity,
        required_role: class.required_role,
        created_at: class.created_at,
        updated_at: class.updated_at,
        created_by,
        trainer,
        category,
        enrollment_count,
        available_spots,
    })
}

#[derive(Debug, Serialize)]
pub struct EnrollmentEntry {
    pub id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub user: Option<UserSummary>,
}

pub async fn build_enrollment_entries(
    db: &DatabaseConnection,
    enrollments: Vec<ClassEnrollment>,
) -> Result<Vec<EnrollmentEntry>, DbErr> {
    let mut entries = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let user = User::find_by_id(db, enrollment.user_id)
            .await?
            .map(|u| UserSummary::from(&u));
        entries.push(EnrollmentEntry {
            id: enrollment.id,
            enrolled_at: enrollment.created_at,
            user,
        });
    }
    Ok(entries)
}
