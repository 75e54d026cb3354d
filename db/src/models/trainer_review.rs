use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trainer_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub reviewer_id: i64,
    pub trainer_id: i64,
    pub comment: String,
    /// Star rating 1..=5; comment-only reviews carry no rating.
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReviewerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Reviewer,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TrainerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Trainer,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        reviewer_id: i64,
        trainer_id: i64,
        comment: &str,
        rating: Option<i32>,
    ) -> Result<Self, DbErr> {
        let active = ActiveModel {
            id: NotSet,
            reviewer_id: Set(reviewer_id),
            trainer_id: Set(trainer_id),
            comment: Set(comment.to_owned()),
            rating: Set(rating),
            created_at: Set(Utc::now()),
        };
        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_desc(Column::CreatedAt).all(db).await
    }

    pub async fn find_for_trainer(
        db: &DatabaseConnection,
        trainer_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// `(total, average)` over a slice of reviews; the average only counts
    /// rated reviews and is `None` when there are none.
    pub fn aggregate(reviews: &[Self]) -> (usize, Option<f64>) {
        let rated: Vec<i32> = reviews.iter().filter_map(|r| r.rating).collect();
        let average = if rated.is_empty() {
            None
        } else {
            Some(rated.iter().map(|r| *r as f64).sum::<f64>() / rated.len() as f64)
        };
        (reviews.len(), average)
    }
}
