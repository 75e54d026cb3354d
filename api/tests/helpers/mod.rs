use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use sea_orm::DatabaseConnection;
use serde_json::Value;

use api::routes::routes;
use api::state::AppState;
use common::config::Config;
use db::models::user::{Model as User, Role};
use db::test_utils::setup_test_db;

/// Points the global config at test values. Idempotent; the first caller
/// in the process wins, with identical values everywhere.
pub fn init_test_config() {
    std::env::set_var("APP_ENV", "test");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    std::env::set_var("JWT_SECRET", "test_secret_key_for_jwt_generation");
    std::env::set_var("STRIPE_WEBHOOK_SECRET", "whsec_test_secret");
    Config::get();
}

/// Full application router over a fresh in-memory database.
pub async fn setup_app() -> (Router, DatabaseConnection) {
    init_test_config();
    let db = setup_test_db().await;
    let app = routes(AppState::new(db.clone()));
    (app, db)
}

pub async fn create_user(db: &DatabaseConnection, email: &str, role: Role) -> User {
    User::create(db, email, "password1", role)
        .await
        .expect("failed to create test user")
}

pub fn token_for(user: &User) -> String {
    api::auth::generate_jwt(user).0
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
