use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

use db::models::trainer_review::Model as TrainerReview;
use db::models::user::{Model as User, Role};

/// Review author/subject projection; unlike the class-roster summary this
/// one carries the profile picture.
#[derive(Debug, Serialize)]
pub struct ReviewUser {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub profile_image: Option<String>,
}

impl From<&User> for ReviewUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            profile_image: user.profile_image.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub comment: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub reviewer: Option<ReviewUser>,
    pub trainer: Option<ReviewUser>,
}

pub async fn build_review_response(
    db: &DatabaseConnection,
    review: TrainerReview,
) -> Result<ReviewResponse, DbErr> {
    let reviewer = User::find_by_id(db, review.reviewer_id)
        .await?
        .map(|u| ReviewUser::from(&u));
    let trainer = User::find_by_id(db, review.trainer_id)
        .await?
        .map(|u| ReviewUser::from(&u));

    Ok(ReviewResponse {
        id: review.id,
        comment: review.comment,
        rating: review.rating,
        created_at: review.created_at,
        reviewer,
        trainer,
    })
}
