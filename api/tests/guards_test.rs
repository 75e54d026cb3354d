mod helpers;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
};
use tower::ServiceExt;

use api::auth::AuthUser;
use api::auth::guards::{attach_auth_if_present, require_admin, require_authenticated};
use db::models::user::Role;
use helpers::{body_json, create_user, get_request, init_test_config, token_for};

async fn test_handler() -> &'static str {
    "OK"
}

/// Echoes whether an auth context was attached.
async fn context_handler(auth: Option<AuthUser>) -> impl IntoResponse {
    Json(auth.map(|AuthUser(claims)| claims.sub))
}

fn authenticated_router() -> Router {
    Router::new()
        .route("/test", get(test_handler))
        .route_layer(from_fn(require_authenticated))
}

fn admin_router() -> Router {
    Router::new()
        .route("/test", get(test_handler))
        .route_layer(from_fn(require_admin))
}

fn attach_router() -> Router {
    Router::new()
        .route("/test", get(context_handler))
        .route_layer(from_fn(attach_auth_if_present))
}

mod test_require_authenticated {
    use super::*;

    #[tokio::test]
    async fn fails_without_token_mentioning_missing() {
        init_test_config();
        let res = authenticated_router()
            .oneshot(get_request("/test", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(res).await;
        assert!(json["message"].as_str().unwrap().contains("Missing"));
    }

    #[tokio::test]
    async fn fails_with_garbage_token_mentioning_invalid() {
        init_test_config();
        let res = authenticated_router()
            .oneshot(get_request("/test", Some("not-a-real-token")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(res).await;
        assert!(json["message"].as_str().unwrap().contains("Invalid"));
    }

    #[tokio::test]
    async fn treats_prefixless_header_as_missing() {
        init_test_config();
        let req = axum::http::Request::builder()
            .uri("/test")
            .header("authorization", "Basic abc123")
            .body(axum::body::Body::empty())
            .unwrap();
        let res = authenticated_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(res).await;
        assert!(json["message"].as_str().unwrap().contains("Missing"));
    }

    #[tokio::test]
    async fn succeeds_for_any_valid_token() {
        let db = db::test_utils::setup_test_db().await;
        init_test_config();
        let user = create_user(&db, "member@example.com", Role::User).await;
        let res = authenticated_router()
            .oneshot(get_request("/test", Some(&token_for(&user))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

mod test_require_admin {
    use super::*;

    #[tokio::test]
    async fn succeeds_for_admin() {
        let db = db::test_utils::setup_test_db().await;
        init_test_config();
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let res = admin_router()
            .oneshot(get_request("/test", Some(&token_for(&admin))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn forbids_every_non_admin_role() {
        let db = db::test_utils::setup_test_db().await;
        init_test_config();
        let roles = [
            Role::Trainer,
            Role::User,
            Role::UserBronze,
            Role::UserGold,
            Role::UserPlatinum,
        ];
        for (i, role) in roles.into_iter().enumerate() {
            let user = create_user(&db, &format!("user{}@example.com", i), role).await;
            let res = admin_router()
                .oneshot(get_request("/test", Some(&token_for(&user))))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "role {:?}", role);
        }
    }

    #[tokio::test]
    async fn fails_without_token() {
        init_test_config();
        let res = admin_router()
            .oneshot(get_request("/test", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

mod test_attach_auth_if_present {
    use super::*;

    #[tokio::test]
    async fn proceeds_with_empty_context_when_no_token() {
        init_test_config();
        let res = attach_router()
            .oneshot(get_request("/test", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn swallows_invalid_tokens() {
        init_test_config();
        let res = attach_router()
            .oneshot(get_request("/test", Some("garbage")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn attaches_context_for_valid_token() {
        let db = db::test_utils::setup_test_db().await;
        init_test_config();
        let user = create_user(&db, "attached@example.com", Role::User).await;
        let res = attach_router()
            .oneshot(get_request("/test", Some(&token_for(&user))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!(user.id));
    }
}
