pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use common::config::Config;
use db::models::user;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Generates a session token and its expiry timestamp for a given user.
pub fn generate_jwt(user: &user::Model) -> (String, String) {
    let config = Config::get();

    let expiry = Utc::now() + Duration::minutes(config.jwt_duration_minutes as i64);
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .expect("Token encoding failed");

    (token, expiry.to_rfc3339())
}

/// Validates signature, structure, and expiry. There is no partial
/// verification mode; any failure is terminal.
pub fn verify_jwt(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let config = Config::get();
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::user::Role;
    use serial_test::serial;

    fn test_user(role: Role) -> user::Model {
        user::Model {
            id: 42,
            email: "jwt@example.com".into(),
            username: None,
            password_hash: "unused".into(),
            role,
            profile_image: None,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn init_test_config() {
        std::env::set_var("APP_ENV", "test");
        std::env::set_var("DATABASE_URL", "sqlite::memory:");
        std::env::set_var("JWT_SECRET", "test_secret_key_for_jwt_generation");
        Config::get();
    }

    #[test]
    #[serial]
    fn claims_round_trip_until_expiry() {
        init_test_config();
        let user = test_user(Role::UserGold);
        let (token, expires_at) = generate_jwt(&user);

        let claims = verify_jwt(&token).expect("fresh token must verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::UserGold);

        let expiry = chrono::DateTime::parse_from_rfc3339(&expires_at).unwrap();
        assert!(expiry > Utc::now());
    }

    #[test]
    #[serial]
    fn tampered_and_malformed_tokens_fail() {
        init_test_config();
        let (token, _) = generate_jwt(&test_user(Role::User));

        let mut tampered = token.clone();
        tampered.pop();
        assert!(verify_jwt(&tampered).is_err());
        assert!(verify_jwt("not.a.token").is_err());
        assert!(verify_jwt("").is_err());
    }

    #[test]
    #[serial]
    fn expired_token_fails_verification() {
        init_test_config();
        let config = Config::get();
        let claims = Claims {
            sub: 1,
            email: "old@example.com".into(),
            role: Role::User,
            // Far enough in the past to clear jsonwebtoken's default leeway.
            exp: (Utc::now() - Duration::minutes(10)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_jwt(&token).is_err());
    }
}
