use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// An uploaded bank-transfer slip. The image itself is stored inline as
/// base64 rather than in an object store.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_proofs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub amount: Option<i32>,
    pub note: Option<String>,
    pub filename: String,
    pub mime_type: String,
    #[serde(skip_serializing)]
    pub image_base64: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        user_id: Option<i64>,
        amount: Option<i32>,
        note: Option<&str>,
        filename: &str,
        mime_type: &str,
        image_base64: String,
    ) -> Result<Self, DbErr> {
        let active = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            amount: Set(amount),
            note: Set(note.map(str::to_owned)),
            filename: Set(filename.to_owned()),
            mime_type: Set(mime_type.to_owned()),
            image_base64: Set(image_base64),
            created_at: Set(Utc::now()),
        };
        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_filtered(
        db: &DatabaseConnection,
        user_id: Option<i64>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(Column::UserId.eq(user_id));
        }
        query.order_by_desc(Column::CreatedAt).all(db).await
    }
}
