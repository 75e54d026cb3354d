mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use db::models::class::{Model as Class, NewClass};
use db::models::user::Role;
use helpers::{body_json, create_user, get_request, json_request, setup_app, token_for};

#[tokio::test]
async fn create_then_duplicate_yields_conflict() {
    let (app, db) = setup_app().await;
    let admin = create_user(&db, "admin@example.com", Role::Admin).await;
    let token = token_for(&admin);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/class-categories",
            Some(&token),
            json!({"name": "A"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = body_json(res).await;
    assert!(json["data"]["id"].as_i64().unwrap() > 0);

    let res = app
        .oneshot(json_request(
            "POST",
            "/class-categories",
            Some(&token),
            json!({"name": "A"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let json = body_json(res).await;
    assert!(json["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn create_requires_name() {
    let (app, db) = setup_app().await;
    let admin = create_user(&db, "admin@example.com", Role::Admin).await;

    let res = app
        .oneshot(json_request(
            "POST",
            "/class-categories",
            Some(&token_for(&admin)),
            json!({"description": "nameless"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mutations_are_admin_gated() {
    let (app, db) = setup_app().await;
    let member = create_user(&db, "member@example.com", Role::User).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/class-categories",
            Some(&token_for(&member)),
            json!({"name": "Nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .oneshot(json_request(
            "POST",
            "/class-categories",
            None,
            json!({"name": "Nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stale_admin_token_is_rejected_by_db_recheck() {
    let (app, db) = setup_app().await;
    let admin = create_user(&db, "demoted@example.com", Role::Admin).await;
    let token = token_for(&admin);

    // Token still claims ADMIN, but the row no longer does.
    admin.update_role(&db, Role::User).await.unwrap();

    let res = app
        .oneshot(json_request(
            "POST",
            "/class-categories",
            Some(&token),
            json!({"name": "Stale"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() {
    let (app, db) = setup_app().await;
    let admin = create_user(&db, "admin@example.com", Role::Admin).await;
    let token = token_for(&admin);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/class-categories",
            Some(&token),
            json!({"name": "Pilates"}),
        ))
        .await
        .unwrap();
    let id = body_json(res).await["data"]["id"].as_i64().unwrap();

    let res = app
        .oneshot(json_request(
            "PUT",
            &format!("/class-categories/{}", id),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert!(json["message"].as_str().unwrap().contains("No fields"));
}

#[tokio::test]
async fn update_missing_category_is_not_found() {
    let (app, db) = setup_app().await;
    let admin = create_user(&db, "admin@example.com", Role::Admin).await;

    let res = app
        .oneshot(json_request(
            "PUT",
            "/class-categories/9999",
            Some(&token_for(&admin)),
            json!({"name": "Ghost"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_refused_while_classes_reference_it() {
    let (app, db) = setup_app().await;
    let admin = create_user(&db, "admin@example.com", Role::Admin).await;
    let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
    let token = token_for(&admin);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/class-categories",
            Some(&token),
            json!({"name": "Busy"}),
        ))
        .await
        .unwrap();
    let category_id = body_json(res).await["data"]["id"].as_i64().unwrap();

    let start = chrono::Utc::now() + chrono::Duration::hours(2);
    Class::create(
        &db,
        NewClass {
            title: "Spin".into(),
            description: None,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            capacity: None,
            required_role: None,
            created_by_id: admin.id,
            trainer_id: trainer.id,
            category_id: Some(category_id),
        },
    )
    .await
    .unwrap();

    let res = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/class-categories/{}", category_id),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_public() {
    let (app, _db) = setup_app().await;
    let res = app
        .oneshot(get_request("/class-categories", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
