use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class::Entity")]
    Class,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        description: Option<&str>,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            name: Set(name.to_owned()),
            description: Set(description.map(str::to_owned)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::CreatedAt).all(db).await
    }

    /// Number of classes still referencing this category. Deletion is
    /// refused while this is non-zero.
    pub async fn class_count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        super::class::Entity::find()
            .filter(super::class::Column::CategoryId.eq(self.id))
            .count(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn name_is_unique() {
        let db = setup_test_db().await;
        Model::create(&db, "Yoga", None).await.unwrap();
        let err = Model::create(&db, "Yoga", Some("again")).await.unwrap_err();
        assert!(crate::is_unique_violation(&err));
    }

    #[tokio::test]
    async fn find_all_orders_by_creation() {
        let db = setup_test_db().await;
        Model::create(&db, "Strength", None).await.unwrap();
        Model::create(&db, "Cardio", None).await.unwrap();
        let all = Model::find_all(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Strength");
    }
}
