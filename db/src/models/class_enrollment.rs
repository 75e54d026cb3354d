use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::user::Role;
use super::{class, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id",
        on_delete = "Cascade"
    )]
    Class,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Everything that can stop an enrollment. The API layer maps these onto
/// HTTP statuses (400/403/404/409).
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("Class not found.")]
    ClassNotFound,

    #[error("User not found.")]
    UserNotFound,

    #[error("Cannot enroll in a class that has started or finished.")]
    ClassStarted,

    #[error("Class is already full.")]
    ClassFull,

    #[error("This class is only available to users with role {0}.")]
    RoleMismatch(Role),

    #[error("User already enrolled in this class.")]
    AlreadyEnrolled,

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl Model {
    /// Enrolls `user_id` into `class_id`, enforcing the start-time,
    /// capacity, and membership-tier gates.
    ///
    /// The capacity check and the insert run inside one transaction so two
    /// racing requests cannot both claim the last seat; the duplicate gate
    /// is the (class_id, user_id) unique index.
    ///
    /// Tier gate: ADMIN and TRAINER always pass; every other role must
    /// equal the class's `required_role` exactly. Tiers are deliberately
    /// not ordered here.
    pub async fn enroll(
        db: &DatabaseConnection,
        class_id: i64,
        user_id: i64,
    ) -> Result<Self, EnrollmentError> {
        let txn = db.begin().await?;

        let class = class::Entity::find_by_id(class_id)
            .one(&txn)
            .await?
            .ok_or(EnrollmentError::ClassNotFound)?;

        if class.start_time <= Utc::now() {
            return Err(EnrollmentError::ClassStarted);
        }

        let user = user::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(EnrollmentError::UserNotFound)?;

        if let Some(required) = class.required_role {
            let bypasses = matches!(user.role, Role::Admin | Role::Trainer);
            if !bypasses && user.role != required {
                return Err(EnrollmentError::RoleMismatch(required));
            }
        }

        if let Some(capacity) = class.capacity {
            let enrolled = Entity::find()
                .filter(Column::ClassId.eq(class_id))
                .count(&txn)
                .await?;
            if enrolled >= capacity as u64 {
                return Err(EnrollmentError::ClassFull);
            }
        }

        let inserted = ActiveModel {
            id: NotSet,
            class_id: Set(class_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if crate::is_unique_violation(&e) {
                EnrollmentError::AlreadyEnrolled
            } else {
                EnrollmentError::Db(e)
            }
        })?;

        txn.commit().await?;
        Ok(inserted)
    }

    pub async fn find_for_class(db: &DatabaseConnection, class_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn find_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// Removes one (user, class) enrollment; `Ok(false)` when none existed.
    pub async fn remove(
        db: &DatabaseConnection,
        class_id: i64,
        user_id: i64,
    ) -> Result<bool, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::UserId.eq(user_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class::NewClass;
    use crate::test_utils::setup_test_db;
    use chrono::Duration;

    async fn seed_class(
        db: &DatabaseConnection,
        capacity: Option<i32>,
        required_role: Option<Role>,
        starts_in_minutes: i64,
    ) -> (class::Model, user::Model) {
        let admin = user::Model::create(db, &format!("admin{}@example.com", starts_in_minutes), "pw", Role::Admin)
            .await
            .unwrap();
        let trainer = user::Model::create(db, &format!("trainer{}@example.com", starts_in_minutes), "pw", Role::Trainer)
            .await
            .unwrap();
        let start = Utc::now() + Duration::minutes(starts_in_minutes);
        let class = class::Model::create(
            db,
            NewClass {
                title: "HIIT".into(),
                description: None,
                start_time: start,
                end_time: start + Duration::hours(1),
                capacity,
                required_role,
                created_by_id: admin.id,
                trainer_id: trainer.id,
                category_id: None,
            },
        )
        .await
        .unwrap();
        (class, admin)
    }

    #[tokio::test]
    async fn enroll_then_duplicate_conflicts() {
        let db = setup_test_db().await;
        let (class, _) = seed_class(&db, None, None, 60).await;
        let member = user::Model::create(&db, "m@example.com", "pw", Role::User)
            .await
            .unwrap();

        Model::enroll(&db, class.id, member.id).await.unwrap();
        let err = Model::enroll(&db, class.id, member.id).await.unwrap_err();
        assert!(matches!(err, EnrollmentError::AlreadyEnrolled));
    }

    #[tokio::test]
    async fn full_class_rejects_any_role() {
        let db = setup_test_db().await;
        let (class, admin) = seed_class(&db, Some(1), None, 90).await;
        let member = user::Model::create(&db, "first@example.com", "pw", Role::User)
            .await
            .unwrap();

        Model::enroll(&db, class.id, member.id).await.unwrap();
        let err = Model::enroll(&db, class.id, admin.id).await.unwrap_err();
        assert!(matches!(err, EnrollmentError::ClassFull));
    }

    #[tokio::test]
    async fn started_class_rejects_enrollment() {
        let db = setup_test_db().await;
        let (class, _) = seed_class(&db, None, None, -5).await;
        let member = user::Model::create(&db, "late@example.com", "pw", Role::User)
            .await
            .unwrap();

        let err = Model::enroll(&db, class.id, member.id).await.unwrap_err();
        assert!(matches!(err, EnrollmentError::ClassStarted));
    }

    #[tokio::test]
    async fn tier_gate_is_exact_match() {
        let db = setup_test_db().await;
        let (class, admin) = seed_class(&db, None, Some(Role::UserBronze), 120).await;

        // A higher tier does not satisfy a lower-tier restriction.
        let gold = user::Model::create(&db, "gold@example.com", "pw", Role::UserGold)
            .await
            .unwrap();
        let err = Model::enroll(&db, class.id, gold.id).await.unwrap_err();
        assert!(matches!(err, EnrollmentError::RoleMismatch(Role::UserBronze)));

        let bronze = user::Model::create(&db, "bronze@example.com", "pw", Role::UserBronze)
            .await
            .unwrap();
        Model::enroll(&db, class.id, bronze.id).await.unwrap();

        // Staff bypass the restriction entirely.
        Model::enroll(&db, class.id, admin.id).await.unwrap();
    }
}
