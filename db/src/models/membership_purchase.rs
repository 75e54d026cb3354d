use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use super::user::Role;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PAID: &str = "paid";

/// One checkout session at the payment gateway, recorded when the session
/// is created and marked paid by the webhook (or the verify fallback).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "membership_purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub session_id: String,
    pub price_id: String,
    /// Membership tier this purchase grants.
    pub role: Role,
    /// Amount in the currency's minor unit.
    pub amount: i32,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
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
    pub async fn create_pending(
        db: &DatabaseConnection,
        user_id: i64,
        session_id: &str,
        price_id: &str,
        role: Role,
        amount: i32,
        currency: &str,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            session_id: Set(session_id.to_owned()),
            price_id: Set(price_id.to_owned()),
            role: Set(role),
            amount: Set(amount),
            currency: Set(currency.to_owned()),
            status: Set(STATUS_PENDING.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(db).await
    }

    pub async fn find_by_session(
        db: &DatabaseConnection,
        session_id: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .one(db)
            .await
    }

    pub fn is_paid(&self) -> bool {
        self.status == STATUS_PAID
    }

    pub async fn mark_paid(self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.into();
        active.status = Set(STATUS_PAID.to_owned());
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
