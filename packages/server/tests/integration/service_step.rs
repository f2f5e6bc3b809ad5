use serde_json::{Value, json};

use crate::common::{TestApp, routes};

async fn app_with_category() -> (TestApp, String, i32) {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("admin@example.com", "securepass")
        .await;
    let category_id = app.create_category("logo", &token).await;
    (app, token, category_id)
}

fn step_body(category_id: i32, title: &str, subtitles: Value) -> Value {
    json!({
        "categories": category_id.to_string(),
        "title": title,
        "subtitles": subtitles,
    })
}

mod create {
    use super::*;

    #[tokio::test]
    async fn all_empty_entries_are_rejected() {
        let (app, token, category_id) = app_with_category().await;

        let res = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(
                    category_id,
                    "Process",
                    json!([
                        {"text": "   ", "headings": ["", "  "]},
                        {"text": "", "headings": []},
                    ]),
                ),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "At least one subtitle or heading is required"
        );
    }

    #[tokio::test]
    async fn heading_only_entry_is_kept_and_blanks_are_dropped() {
        let (app, token, category_id) = app_with_category().await;

        let res = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(
                    category_id,
                    "  Process  ",
                    json!([
                        {"text": "", "headings": ["  Sketching ", ""]},
                        {"text": " ", "headings": [" "]},
                    ]),
                ),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = &res.body["data"];
        assert_eq!(data["title"], "Process");
        assert_eq!(data["category_id"], category_id);
        assert_eq!(
            data["subtitles"],
            json!([{"text": "", "headings": ["Sketching"]}])
        );
    }

    #[tokio::test]
    async fn mismatched_category_id_is_rejected() {
        let (app, token, _) = app_with_category().await;
        let poster = app.create_category("poster", &token).await;

        let res = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(poster, "Process", json!([{"text": "Brief", "headings": []}])),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "Category ID does not match category name in URL"
        );
    }

    #[tokio::test]
    async fn missing_title_is_rejected() {
        let (app, token, category_id) = app_with_category().await;

        let res = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(category_id, " ", json!([{"text": "Brief", "headings": []}])),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Service step title is required");
    }

    #[tokio::test]
    async fn non_numeric_categories_is_rejected() {
        let (app, token, _) = app_with_category().await;

        let res = app
            .post_with_token(
                &routes::service_steps("logo"),
                &json!({
                    "categories": "logo",
                    "title": "Process",
                    "subtitles": [{"text": "Brief", "headings": []}],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Invalid categories ID");
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn listing_is_public_and_oldest_first() {
        let (app, token, category_id) = app_with_category().await;
        for title in ["First", "Second"] {
            let res = app
                .post_with_token(
                    &routes::service_steps("logo"),
                    &step_body(category_id, title, json!([{"text": "x", "headings": []}])),
                    &token,
                )
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        let res = app.get_without_token(&routes::service_steps("LOGO")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["count"], 2);
        assert_eq!(res.body["data"][0]["title"], "First");
        assert_eq!(res.body["data"][1]["title"], "Second");
    }

    #[tokio::test]
    async fn single_step_is_scoped_to_its_category() {
        let (app, token, category_id) = app_with_category().await;
        app.create_category("poster", &token).await;
        let created = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(category_id, "Process", json!([{"text": "x", "headings": []}])),
                &token,
            )
            .await;
        let id = created.data_id();

        let found = app
            .get_with_token(&routes::service_step("logo", id), &token)
            .await;
        assert_eq!(found.status, 200, "{}", found.text);
        assert_eq!(found.body["data"]["id"], id);

        let elsewhere = app
            .get_with_token(&routes::service_step("poster", id), &token)
            .await;
        assert_eq!(elsewhere.status, 404);
        assert_eq!(elsewhere.body["message"], "Service step not found");
    }

    #[tokio::test]
    async fn single_step_requires_authentication() {
        let (app, _, _) = app_with_category().await;

        let res = app.get_without_token(&routes::service_step("logo", 1)).await;

        assert_eq!(res.status, 401);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn replace_rewrites_title_and_subtitles() {
        let (app, token, category_id) = app_with_category().await;
        let created = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(category_id, "Draft", json!([{"text": "old", "headings": []}])),
                &token,
            )
            .await;
        let id = created.data_id();

        let res = app
            .put_with_token(
                &routes::service_step("logo", id),
                &step_body(
                    category_id,
                    "Final",
                    json!([{"text": "new", "headings": ["a", "b"]}]),
                ),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["title"], "Final");
        assert_eq!(
            res.body["data"]["subtitles"],
            json!([{"text": "new", "headings": ["a", "b"]}])
        );
    }

    #[tokio::test]
    async fn update_in_another_category_is_not_found() {
        let (app, token, category_id) = app_with_category().await;
        let poster = app.create_category("poster", &token).await;
        let created = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(category_id, "Draft", json!([{"text": "x", "headings": []}])),
                &token,
            )
            .await;
        let id = created.data_id();

        let res = app
            .put_with_token(
                &routes::service_step("poster", id),
                &step_body(poster, "Hijack", json!([{"text": "x", "headings": []}])),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn step_can_be_deleted_once() {
        let (app, token, category_id) = app_with_category().await;
        let created = app
            .post_with_token(
                &routes::service_steps("logo"),
                &step_body(category_id, "Process", json!([{"text": "x", "headings": []}])),
                &token,
            )
            .await;
        let id = created.data_id();

        let first = app
            .delete_with_token(&routes::service_step("logo", id), &token)
            .await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["message"], "Service step deleted successfully");

        let second = app
            .delete_with_token(&routes::service_step("logo", id), &token)
            .await;
        assert_eq!(second.status, 404);
    }
}
