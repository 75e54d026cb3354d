use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Number of random bytes in a password-reset token (hex-encoded on the
/// wire, so the user-facing token is twice this length).
const RESET_TOKEN_BYTES: usize = 6;

/// Represents an account in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User's unique email address.
    pub email: String,
    /// Optional display name.
    pub username: Option<String>,
    /// Securely hashed password string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Platform role, also carried in session tokens.
    pub role: Role,
    /// Profile picture as an inline base64 data URL.
    pub profile_image: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Platform-wide role. `Admin` and `Trainer` are staff roles; the four
/// `User*` variants are the membership tiers customers can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "ADMIN")]
    Admin,

    #[sea_orm(string_value = "TRAINER")]
    Trainer,

    #[sea_orm(string_value = "USER")]
    User,

    #[sea_orm(string_value = "USER_BRONZE")]
    UserBronze,

    #[sea_orm(string_value = "USER_GOLD")]
    UserGold,

    #[sea_orm(string_value = "USER_PLATINUM")]
    UserPlatinum,
}

impl Role {
    /// Membership roles are the only valid values for a class's
    /// `required_role` restriction.
    pub fn is_membership(&self) -> bool {
        matches!(
            self,
            Role::User | Role::UserBronze | Role::UserGold | Role::UserPlatinum
        )
    }

    /// Ordering of the membership tiers, used when gating purchases.
    /// Staff roles have no rank. Note that class enrollment does NOT use
    /// this ordering; it requires an exact tier match.
    pub fn tier_rank(&self) -> Option<u8> {
        match self {
            Role::User => Some(0),
            Role::UserBronze => Some(1),
            Role::UserGold => Some(2),
            Role::UserPlatinum => Some(3),
            Role::Admin | Role::Trainer => None,
        }
    }
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
    /// Creates a user with a freshly hashed password.
    pub async fn create(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            email: Set(email.to_owned()),
            username: NotSet,
            password_hash: Set(hash_password(password)?),
            role: Set(role),
            profile_image: NotSet,
            reset_token: NotSet,
            reset_token_expires_at: NotSet,
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Self>, DbErr> {
        Entity::find().filter(Column::Email.eq(email)).one(db).await
    }

    pub async fn find_by_role(db: &DatabaseConnection, role: Role) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::Role.eq(role))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// Checks the given plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|hash| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &hash)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub async fn set_password(self, db: &DatabaseConnection, password: &str) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.into();
        active.password_hash = Set(hash_password(password)?);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn update_role(self, db: &DatabaseConnection, role: Role) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Issues a new password-reset token valid for `expiry_minutes` and
    /// stores it on the user row. Returns the updated row and the
    /// plaintext token for out-of-band delivery. Any previously issued
    /// token is replaced.
    pub async fn issue_reset_token(
        self,
        db: &DatabaseConnection,
        expiry_minutes: i64,
    ) -> Result<(Self, String), DbErr> {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let mut active: ActiveModel = self.into();
        active.reset_token = Set(Some(token.clone()));
        active.reset_token_expires_at = Set(Some(Utc::now() + Duration::minutes(expiry_minutes)));
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;
        Ok((updated, token))
    }

    /// Rolls an issued token back to the `none` state. Used both after a
    /// failed delivery (no token may stay valid without a delivery
    /// confirmation) and after consumption.
    pub async fn clear_reset_token(self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.into();
        active.reset_token = Set(None);
        active.reset_token_expires_at = Set(None);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Exact-match lookup, expired or not. Callers distinguish "found but
    /// expired" from "not found" via [`Model::reset_token_usable`].
    pub async fn find_by_reset_token(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::ResetToken.eq(token))
            .one(db)
            .await
    }

    pub fn reset_token_usable(&self) -> bool {
        self.reset_token_expires_at
            .map(|expires_at| expires_at >= Utc::now())
            .unwrap_or(false)
    }

    /// Consumes a reset token: stores the new password and clears the token
    /// unconditionally (single use).
    pub async fn reset_password(self, db: &DatabaseConnection, password: &str) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.into();
        active.password_hash = Set(hash_password(password)?);
        active.reset_token = Set(None);
        active.reset_token_expires_at = Set(None);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}

fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("password hashing failed: {}", e)))
}
