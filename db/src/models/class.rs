use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use super::user::Role;

/// A scheduled fitness class in the `classes` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Maximum enrollment; `None` means unlimited.
    pub capacity: Option<i32>,
    /// When set, restricts enrollment to exactly this membership tier
    /// (staff roles bypass the restriction).
    pub required_role: Option<Role>,
    pub created_by_id: i64,
    pub trainer_id: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_category::Entity",
        from = "Column::CategoryId",
        to = "super::class_category::Column::Id"
    )]
    Category,

    #[sea_orm(has_many = "super::class_enrollment::Entity")]
    Enrollment,
}

impl Related<super::class_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::class_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Field bundle for [`Model::create`].
#[derive(Debug, Clone)]
pub struct NewClass {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub required_role: Option<Role>,
    pub created_by_id: i64,
    pub trainer_id: i64,
    pub category_id: Option<i64>,
}

impl Model {
    pub async fn create(db: &DatabaseConnection, new: NewClass) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            title: Set(new.title),
            description: Set(new.description),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
            capacity: Set(new.capacity),
            required_role: Set(new.required_role),
            created_by_id: Set(new.created_by_id),
            trainer_id: Set(new.trainer_id),
            category_id: Set(new.category_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::StartTime).all(db).await
    }

    pub async fn find_upcoming(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::StartTime.gt(Utc::now()))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await
    }

    pub async fn find_by_trainer(db: &DatabaseConnection, trainer_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await
    }

    pub async fn enrollment_count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        super::class_enrollment::Entity::find()
            .filter(super::class_enrollment::Column::ClassId.eq(self.id))
            .count(db)
            .await
    }

    /// Remaining seats, or `None` when the class is uncapped.
    pub fn available_spots(&self, enrollment_count: u64) -> Option<i64> {
        self.capacity
            .map(|capacity| (capacity as i64 - enrollment_count as i64).max(0))
    }
}
