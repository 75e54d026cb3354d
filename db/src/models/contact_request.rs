use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        email: &str,
        phone_number: &str,
        subject: &str,
        message: &str,
    ) -> Result<Self, DbErr> {
        let active = ActiveModel {
            id: NotSet,
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            phone_number: Set(phone_number.to_owned()),
            subject: Set(subject.to_owned()),
            message: Set(message.to_owned()),
            created_at: Set(Utc::now()),
        };
        active.insert(db).await
    }
}
