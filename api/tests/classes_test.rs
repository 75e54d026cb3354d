mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

use db::models::class::{Model as Class, NewClass};
use db::models::user::{Model as User, Role};
use helpers::{body_json, create_user, get_request, json_request, setup_app, token_for};

async fn seed_class(
    db: &DatabaseConnection,
    admin: &User,
    trainer: &User,
    capacity: Option<i32>,
    required_role: Option<Role>,
    starts_in_minutes: i64,
) -> Class {
    let start = Utc::now() + Duration::minutes(starts_in_minutes);
    Class::create(
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
    .unwrap()
}

mod test_create_class {
    use super::*;

    #[tokio::test]
    async fn create_validates_and_succeeds() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let token = token_for(&admin);

        let start = (Utc::now() + Duration::hours(3)).to_rfc3339();
        let end = (Utc::now() + Duration::hours(4)).to_rfc3339();

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/classes",
                Some(&token),
                json!({
                    "trainerId": trainer.id,
                    "title": "Evening HIIT",
                    "startTime": start,
                    "endTime": end,
                    "capacity": 10,
                    "requiredRole": "USER_GOLD"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let json = body_json(res).await;
        assert_eq!(json["data"]["title"], "Evening HIIT");
        assert_eq!(json["data"]["required_role"], "USER_GOLD");
        assert_eq!(json["data"]["enrollment_count"], 0);
        assert_eq!(json["data"]["available_spots"], 10);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_and_bad_values() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let token = token_for(&admin);
        let start = (Utc::now() + Duration::hours(3)).to_rfc3339();
        let end = (Utc::now() + Duration::hours(4)).to_rfc3339();

        // Missing trainerId
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/classes",
                Some(&token),
                json!({"title": "X", "startTime": start, "endTime": end}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        // End before start
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/classes",
                Some(&token),
                json!({"trainerId": trainer.id, "title": "X", "startTime": end, "endTime": start}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        // Staff role as restriction
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/classes",
                Some(&token),
                json!({
                    "trainerId": trainer.id,
                    "title": "X",
                    "startTime": start,
                    "endTime": end,
                    "requiredRole": "ADMIN"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        // Non-trainer referenced
        let member = create_user(&db, "member@example.com", Role::User).await;
        let res = app
            .oneshot(json_request(
                "POST",
                "/classes",
                Some(&token),
                json!({"trainerId": member.id, "title": "X", "startTime": start, "endTime": end}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

mod test_enrollment {
    use super::*;

    #[tokio::test]
    async fn enroll_once_then_conflict() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let member = create_user(&db, "member@example.com", Role::User).await;
        let class = seed_class(&db, &admin, &trainer, None, None, 90).await;
        let token = token_for(&member);
        let uri = format!("/classes/{}/enroll", class.id);

        let res = app
            .clone()
            .oneshot(json_request("POST", &uri, Some(&token), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(json_request("POST", &uri, Some(&token), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let json = body_json(res).await;
        assert!(json["message"].as_str().unwrap().contains("already enrolled"));
    }

    #[tokio::test]
    async fn enrollment_requires_authentication() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let class = seed_class(&db, &admin, &trainer, None, None, 90).await;

        let res = app
            .oneshot(json_request(
                "POST",
                &format!("/classes/{}/enroll", class.id),
                None,
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn full_class_rejects_regardless_of_role() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let member = create_user(&db, "member@example.com", Role::User).await;
        let class = seed_class(&db, &admin, &trainer, Some(1), None, 90).await;
        let uri = format!("/classes/{}/enroll", class.id);

        let res = app
            .clone()
            .oneshot(json_request("POST", &uri, Some(&token_for(&member)), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        // Even an admin is turned away once the last seat is gone.
        let res = app
            .oneshot(json_request("POST", &uri, Some(&token_for(&admin)), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert!(json["message"].as_str().unwrap().contains("full"));
    }

    #[tokio::test]
    async fn started_class_rejects_enrollment() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let member = create_user(&db, "member@example.com", Role::User).await;
        let class = seed_class(&db, &admin, &trainer, None, None, -5).await;

        let res = app
            .oneshot(json_request(
                "POST",
                &format!("/classes/{}/enroll", class.id),
                Some(&token_for(&member)),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(
            json["message"],
            "Cannot enroll in a class that has started or finished."
        );
    }

    #[tokio::test]
    async fn tier_restriction_is_exact_and_staff_bypass() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let gold = create_user(&db, "gold@example.com", Role::UserGold).await;
        let bronze = create_user(&db, "bronze@example.com", Role::UserBronze).await;
        let class = seed_class(&db, &admin, &trainer, None, Some(Role::UserBronze), 90).await;
        let uri = format!("/classes/{}/enroll", class.id);

        // Gold does not satisfy a bronze restriction.
        let res = app
            .clone()
            .oneshot(json_request("POST", &uri, Some(&token_for(&gold)), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .clone()
            .oneshot(json_request("POST", &uri, Some(&token_for(&bronze)), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(json_request("POST", &uri, Some(&token_for(&trainer)), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn unknown_class_is_not_found() {
        let (app, db) = setup_app().await;
        let member = create_user(&db, "member@example.com", Role::User).await;

        let res = app
            .oneshot(json_request(
                "POST",
                "/classes/9999/enroll",
                Some(&token_for(&member)),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

mod test_catalog {
    use super::*;

    #[tokio::test]
    async fn upcoming_excludes_started_classes() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        seed_class(&db, &admin, &trainer, None, None, -30).await;
        seed_class(&db, &admin, &trainer, None, None, 60).await;

        let res = app
            .clone()
            .oneshot(get_request("/classes", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["data"].as_array().unwrap().len(), 2);

        let res = app
            .oneshot(get_request("/classes/upcoming", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn roster_lists_enrolled_users() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let member = create_user(&db, "member@example.com", Role::User).await;
        let class = seed_class(&db, &admin, &trainer, None, None, 90).await;

        db::models::class_enrollment::Model::enroll(&db, class.id, member.id)
            .await
            .unwrap();

        let res = app
            .oneshot(get_request(
                &format!("/classes/{}/enrollments", class.id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        let entries = json["data"]["enrollments"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["user"]["id"], member.id);
    }

    #[tokio::test]
    async fn trainer_can_only_view_own_schedule() {
        let (app, db) = setup_app().await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let trainer = create_user(&db, "trainer@example.com", Role::Trainer).await;
        let other_trainer = create_user(&db, "other@example.com", Role::Trainer).await;
        seed_class(&db, &admin, &trainer, None, None, 90).await;

        let res = app
            .clone()
            .oneshot(get_request(
                &format!("/classes/trainer/{}", trainer.id),
                Some(&token_for(&other_trainer)),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .oneshot(get_request(
                &format!("/classes/trainer/{}", trainer.id),
                Some(&token_for(&trainer)),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
