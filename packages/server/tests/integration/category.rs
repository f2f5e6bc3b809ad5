use serde_json::json;

use crate::common::{TestApp, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn name_is_stored_in_title_case() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;

        let res = app
            .post_with_token(
                routes::CATEGORIES,
                &json!({"nameCategory": "  visual   MOTION "}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Category created successfully");
        assert_eq!(res.body["data"]["nameCategory"], "Visual Motion");
        assert!(res.body["data"]["id"].is_number());
    }

    #[tokio::test]
    async fn spelling_variants_collide() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        app.create_category("logo", &token).await;

        for variant in ["Logo", " LOGO ", "lOgO"] {
            let res = app
                .post_with_token(
                    routes::CATEGORIES,
                    &json!({"nameCategory": variant}),
                    &token,
                )
                .await;
            assert_eq!(res.status, 409, "{variant}: {}", res.text);
            assert_eq!(res.body["error"], "CONFLICT");
        }
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;

        let res = app
            .post_with_token(routes::CATEGORIES, &json!({"nameCategory": "   "}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn allow_list_rejects_unknown_names() {
        let app =
            TestApp::spawn_with_categories(vec!["Logo".into(), "Visual Motion".into()]).await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;

        let rejected = app
            .post_with_token(routes::CATEGORIES, &json!({"nameCategory": "Poster"}), &token)
            .await;
        assert_eq!(rejected.status, 400);
        assert!(
            rejected.body["message"]
                .as_str()
                .unwrap()
                .contains("Allowed categories")
        );

        let accepted = app
            .post_with_token(
                routes::CATEGORIES,
                &json!({"nameCategory": "visual motion"}),
                &token,
            )
            .await;
        assert_eq!(accepted.status, 200, "{}", accepted.text);
    }

    #[tokio::test]
    async fn creating_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::CATEGORIES, &json!({"nameCategory": "Logo"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["error"], "TOKEN_MISSING");
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn listing_is_public_and_ordered_by_id() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        let logo = app.create_category("logo", &token).await;
        let motion = app.create_category("visual motion", &token).await;

        let res = app.get_without_token(routes::CATEGORIES).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["count"], 2);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data[0]["id"], logo);
        assert_eq!(data[1]["id"], motion);
        assert_eq!(data[1]["nameCategory"], "Visual Motion");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn rename_normalizes_the_new_name() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        let id = app.create_category("logo", &token).await;

        let res = app
            .put_with_token(
                &routes::category(id),
                &json!({"nameCategory": "brand identity"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["nameCategory"], "Brand Identity");
    }

    #[tokio::test]
    async fn rename_to_an_existing_name_conflicts() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        app.create_category("logo", &token).await;
        let poster = app.create_category("poster", &token).await;

        let res = app
            .put_with_token(
                &routes::category(poster),
                &json!({"nameCategory": "LOGO"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn renaming_to_its_own_name_is_allowed() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        let id = app.create_category("logo", &token).await;

        let res = app
            .put_with_token(&routes::category(id), &json!({"nameCategory": "LOGO"}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;

        let res = app
            .put_with_token(&routes::category(9999), &json!({"nameCategory": "Logo"}), &token)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;

        let res = app
            .put_with_token(
                "/projects/categories/abc",
                &json!({"nameCategory": "Logo"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn unused_category_can_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        let id = app.create_category("logo", &token).await;

        let res = app.delete_with_token(&routes::category(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Category deleted successfully");

        let list = app.get_without_token(routes::CATEGORIES).await;
        assert_eq!(list.body["count"], 0);
    }

    #[tokio::test]
    async fn category_with_a_project_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        let id = app.create_category("logo", &token).await;
        app.create_video_url_project("logo", "https://youtu.be/dQw4w9WgXcQ", &token)
            .await;

        let res = app.delete_with_token(&routes::category(id), &token).await;

        assert_eq!(res.status, 409, "{}", res.text);
        assert_eq!(res.body["error"], "CONFLICT");
        assert!(res.body["message"].as_str().unwrap().contains("1 project(s)"));

        let list = app.get_without_token(routes::CATEGORIES).await;
        assert_eq!(list.body["count"], 1);
    }

    #[tokio::test]
    async fn category_with_a_service_step_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;
        let id = app.create_category("logo", &token).await;
        let step = app
            .post_with_token(
                &routes::service_steps("logo"),
                &json!({
                    "categories": id.to_string(),
                    "title": "Process",
                    "subtitles": [{"text": "Briefing", "headings": []}],
                }),
                &token,
            )
            .await;
        assert_eq!(step.status, 200, "{}", step.text);

        let res = app.delete_with_token(&routes::category(id), &token).await;

        assert_eq!(res.status, 409);
        assert!(
            res.body["message"]
                .as_str()
                .unwrap()
                .contains("1 service step(s)")
        );
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("admin@example.com", "securepass")
            .await;

        let res = app.delete_with_token(&routes::category(4242), &token).await;

        assert_eq!(res.status, 404);
    }
}
