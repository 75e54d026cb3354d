use db::models::user::Role;
use serde::{Deserialize, Serialize};

/// Payload embedded in every session token. The role is a snapshot taken
/// at issue time; privileged mutations re-check the database instead of
/// trusting it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

/// Per-request authentication context derived from a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
