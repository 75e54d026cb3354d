mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use db::models::user::{Model as User, Role};
use helpers::{body_json, create_user, get_request, json_request, setup_app, token_for};

mod test_role_change {
    use super::*;

    #[tokio::test]
    async fn admin_updates_a_role() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let member = create_user(&db, "member@example.com", Role::User).await;

        let res = app
            .oneshot(json_request(
                "PATCH",
                &format!("/users/{}/role", member.id),
                Some(&token_for(&admin)),
                json!({"role": "TRAINER"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["data"]["role"], "TRAINER");

        let reloaded = User::find_by_id(&db, member.id).await.unwrap().unwrap();
        assert_eq!(reloaded.role, Role::Trainer);
    }

    #[tokio::test]
    async fn invalid_role_is_rejected() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let member = create_user(&db, "member@example.com", Role::User).await;

        let res = app
            .oneshot(json_request(
                "PATCH",
                &format!("/users/{}/role", member.id),
                Some(&token_for(&admin)),
                json!({"role": "SUPERUSER"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(json["message"], "Invalid role.");
    }

    #[tokio::test]
    async fn non_admin_token_is_forbidden() {
        let (app, db) = setup_app().await;
        let member = create_user(&db, "member@example.com", Role::User).await;
        let other = create_user(&db, "other@example.com", Role::User).await;

        let res = app
            .oneshot(json_request(
                "PATCH",
                &format!("/users/{}/role", other.id),
                Some(&token_for(&member)),
                json!({"role": "ADMIN"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn self_promotion_to_admin_again_is_rejected() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;

        let res = app
            .oneshot(json_request(
                "PATCH",
                &format!("/users/{}/role", admin.id),
                Some(&token_for(&admin)),
                json!({"role": "ADMIN"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;

        let res = app
            .oneshot(json_request(
                "PATCH",
                "/users/9999/role",
                Some(&token_for(&admin)),
                json!({"role": "TRAINER"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

mod test_listing {
    use super::*;

    #[tokio::test]
    async fn list_users_filters_by_role() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        create_user(&db, "trainer@example.com", Role::Trainer).await;
        create_user(&db, "member@example.com", Role::User).await;

        let res = app
            .clone()
            .oneshot(get_request("/users?role=TRAINER", Some(&token_for(&admin))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        let users = json["data"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["role"], "TRAINER");

        let res = app
            .oneshot(get_request("/users?role=WIZARD", Some(&token_for(&admin))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn roles_listing_contains_the_closed_set() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;

        let res = app
            .oneshot(get_request("/users/roles", Some(&token_for(&admin))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        let roles: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_str().unwrap())
            .collect();
        assert_eq!(
            roles,
            vec![
                "ADMIN",
                "TRAINER",
                "USER",
                "USER_BRONZE",
                "USER_GOLD",
                "USER_PLATINUM"
            ]
        );
    }
}

mod test_profile {
    use super::*;

    #[tokio::test]
    async fn profile_never_leaks_credentials() {
        let (app, db) = setup_app().await;
        let member = create_user(&db, "member@example.com", Role::User).await;

        let res = app
            .oneshot(get_request(&format!("/users/{}", member.id), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["data"]["email"], "member@example.com");
        assert!(json["data"].get("password_hash").is_none());
        assert!(json["data"].get("reset_token").is_none());
    }

    #[tokio::test]
    async fn username_collision_is_rejected() {
        let (app, db) = setup_app().await;
        let first = create_user(&db, "first@example.com", Role::User).await;
        let second = create_user(&db, "second@example.com", Role::User).await;

        let res = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/users/{}", first.id),
                None,
                json!({"username": "taken"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(json_request(
                "PUT",
                &format!("/users/{}", second.id),
                None,
                json!({"username": "taken"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

mod test_change_password {
    use super::*;

    #[tokio::test]
    async fn requires_the_current_password() {
        let (app, db) = setup_app().await;
        let member = create_user(&db, "member@example.com", Role::User).await;
        let token = token_for(&member);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/users/change-password",
                Some(&token),
                json!({"currentPassword": "wrong", "newPassword": "longenough"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/users/change-password",
                Some(&token),
                json!({"currentPassword": "password1", "newPassword": "short"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .oneshot(json_request(
                "POST",
                "/users/change-password",
                Some(&token),
                json!({"currentPassword": "password1", "newPassword": "longenough"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let reloaded = User::find_by_id(&db, member.id).await.unwrap().unwrap();
        assert!(reloaded.verify_password("longenough"));
    }
}

mod test_enrollments {
    use super::*;
    use chrono::{Duration, Utc};
    use db::models::class::{Model as Class, NewClass};
    use db::models::class_enrollment::Model as ClassEnrollment;

    #[tokio::test]
    async fn listing_and_removal_round_trip() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let member = create_user(&db, "member@example.com", Role::User).await;

        let start = Utc::now() + Duration::hours(2);
        let class = Class::create(
            &db,
            NewClass {
                title: "Stretch".into(),
                description: None,
                start_time: start,
                end_time: start + Duration::hours(1),
                capacity: None,
                required_role: None,
                created_by_id: admin.id,
                trainer_id: trainer.id,
                category_id: None,
            },
        )
        .await
        .unwrap();
        ClassEnrollment::enroll(&db, class.id, member.id).await.unwrap();

        let res = app
            .clone()
            .oneshot(get_request(&format!("/users/{}/classes", member.id), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        let enrollments = json["data"]["enrollments"].as_array().unwrap();
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0]["status"], "UPCOMING");
        assert_eq!(enrollments[0]["has_started"], false);

        let res = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/users/{}/classes/{}", member.id, class.id),
                None,
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        // Second removal finds nothing.
        let res = app
            .oneshot(json_request(
                "DELETE",
                &format!("/users/{}/classes/{}", member.id, class.id),
                None,
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
