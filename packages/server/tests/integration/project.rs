use serde_json::json;

use crate::common::{TestApp, file_part, jpeg_bytes, routes};

/// Spawn an app with a signed-in user and a "Logo" category.
async fn app_with_category() -> (TestApp, String, i32) {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("admin@example.com", "securepass")
        .await;
    let category_id = app.create_category("logo", &token).await;
    (app, token, category_id)
}

mod add {
    use super::*;

    #[tokio::test]
    async fn image_upload_creates_a_project() {
        let (app, token, category_id) = app_with_category().await;

        let res = app.create_image_project("logo", &token).await;

        let data = &res.body["data"];
        assert_eq!(res.body["message"], "Project created successfully");
        assert_eq!(data["category_id"], category_id);
        assert_eq!(data["mediaType"], "image");
        assert_eq!(data["videoUrl"], "");
        let image_url = data["imageUrl"].as_str().unwrap();
        assert!(image_url.starts_with(&app.url("/files/")));

        let download = app.client.get(image_url).send().await.unwrap();
        assert_eq!(download.status().as_u16(), 200);
        assert_eq!(download.headers()["content-type"], "image/jpeg");
    }

    #[tokio::test]
    async fn youtube_link_is_stored_as_external_video() {
        let (app, token, _) = app_with_category().await;
        let form = reqwest::multipart::Form::new()
            .text("type", "videoUrl")
            .text("videoUrl", "https://youtu.be/dQw4w9WgXcQ");

        let res = app
            .multipart_with_token(&routes::projects_in("logo"), form, &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["videoUrl"], "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(res.body["data"]["imageUrl"], "");
        assert_eq!(res.body["data"]["mediaType"], "youtube");
    }

    #[tokio::test]
    async fn path_category_matches_any_casing() {
        let (app, token, category_id) = app_with_category().await;

        let id = app
            .create_video_url_project("LOGO", "https://vimeo.com/1", &token)
            .await;

        let res = app.get_without_token(&routes::projects_in("logo")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"][0]["id"], id);
        assert_eq!(res.body["data"][0]["category_id"], category_id);
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let (app, token, _) = app_with_category().await;
        let form = reqwest::multipart::Form::new().text("videoUrl", "https://youtu.be/x");

        let res = app
            .multipart_with_token(&routes::projects_in("poster"), form, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Category not found");
    }

    #[tokio::test]
    async fn file_and_url_together_are_rejected() {
        let (app, token, _) = app_with_category().await;
        let form = reqwest::multipart::Form::new()
            .text("type", "image")
            .text("videoUrl", "https://youtu.be/x")
            .part("file", file_part("cover.jpg", "image/jpeg", jpeg_bytes(128)));

        let res = app
            .multipart_with_token(&routes::projects_in("logo"), form, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(app.blob_count(), 0);
    }

    #[tokio::test]
    async fn empty_form_is_rejected() {
        let (app, token, _) = app_with_category().await;
        let form = reqwest::multipart::Form::new().text("type", "image");

        let res = app
            .multipart_with_token(&routes::projects_in("logo"), form, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "No file or video URL provided");
    }

    #[tokio::test]
    async fn non_http_video_url_is_rejected() {
        let (app, token, _) = app_with_category().await;
        let form = reqwest::multipart::Form::new().text("videoUrl", "ftp://example.com/clip");

        let res = app
            .multipart_with_token(&routes::projects_in("logo"), form, &token)
            .await;

        assert_eq!(res.status, 400);
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn listing_is_public_and_newest_first() {
        let (app, token, _) = app_with_category().await;
        app.create_category("poster", &token).await;
        let first = app
            .create_video_url_project("logo", "https://youtu.be/one", &token)
            .await;
        let second = app
            .create_video_url_project("poster", "https://youtu.be/two", &token)
            .await;

        let all = app.get_without_token(routes::PROJECTS).await;
        assert_eq!(all.status, 200, "{}", all.text);
        assert_eq!(all.body["count"], 2);
        assert_eq!(all.body["data"][0]["id"], second);
        assert_eq!(all.body["data"][1]["id"], first);

        let logo = app.get_without_token(&routes::projects_in("logo")).await;
        assert_eq!(logo.body["count"], 1);
        assert_eq!(logo.body["data"][0]["id"], first);
    }

    #[tokio::test]
    async fn unknown_category_listing_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::projects_in("nothing")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Category not found");
    }

    #[tokio::test]
    async fn invalid_token_on_public_listing_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::PROJECTS, "bogus").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["error"], "TOKEN_INVALID");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn mismatched_category_is_not_found() {
        let (app, token, _) = app_with_category().await;
        app.create_category("poster", &token).await;
        let id = app
            .create_video_url_project("logo", "https://youtu.be/one", &token)
            .await;

        let res = app
            .put_with_token(
                &routes::project("poster", id),
                &json!({"videoUrl": "https://youtu.be/two"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(res.body["message"], "Project not found or category does not match");

        let logo = app.get_without_token(&routes::projects_in("logo")).await;
        assert_eq!(logo.body["data"][0]["videoUrl"], "https://youtu.be/one");
    }

    #[tokio::test]
    async fn replacing_an_image_removes_the_old_file() {
        let (app, token, _) = app_with_category().await;
        let created = app.create_image_project("logo", &token).await;
        let id = created.data_id();
        let old_url = created.body["data"]["imageUrl"].as_str().unwrap().to_string();
        assert_eq!(app.blob_count(), 1);

        let res = app
            .put_with_token(
                &routes::project("logo", id),
                &json!({"videoUrl": "https://youtu.be/new"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["imageUrl"], "");
        assert_eq!(res.body["data"]["videoUrl"], "https://youtu.be/new");
        assert_eq!(app.blob_count(), 0);

        let gone = app.client.get(&old_url).send().await.unwrap();
        assert_eq!(gone.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn image_and_video_together_are_rejected() {
        let (app, token, _) = app_with_category().await;
        let created = app.create_image_project("logo", &token).await;
        let id = created.data_id();
        let image_url = created.body["data"]["imageUrl"].as_str().unwrap();

        let res = app
            .put_with_token(
                &routes::project("logo", id),
                &json!({"imageUrl": image_url, "videoUrl": "https://youtu.be/x"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(app.blob_count(), 1);
    }

    #[tokio::test]
    async fn reference_to_a_missing_file_is_rejected() {
        let (app, token, _) = app_with_category().await;
        let id = app
            .create_video_url_project("logo", "https://youtu.be/one", &token)
            .await;

        let res = app
            .put_with_token(
                &routes::project("logo", id),
                &json!({"imageUrl": app.url("/files/0190f1c2-7d3e-7abc-8def-0123456789ab")}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Referenced file does not exist");
    }

    #[tokio::test]
    async fn uploaded_file_can_be_attached_by_url() {
        let (app, token, _) = app_with_category().await;
        let id = app
            .create_video_url_project("logo", "https://youtu.be/one", &token)
            .await;
        let up = app
            .upload_file("image", "cover.png", "image/png", vec![1u8; 256], &token)
            .await;
        let file_url = up.body["data"]["fileUrl"].as_str().unwrap();

        let res = app
            .put_with_token(
                &routes::project("logo", id),
                &json!({"imageUrl": file_url, "videoUrl": ""}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["imageUrl"], file_url);
        assert_eq!(res.body["data"]["mediaType"], "image");
    }

    #[tokio::test]
    async fn file_in_use_cannot_be_attached_to_another_project() {
        let (app, token, _) = app_with_category().await;
        let owner = app.create_image_project("logo", &token).await;
        let image_url = owner.body["data"]["imageUrl"].as_str().unwrap().to_string();
        let other = app
            .create_video_url_project("logo", "https://youtu.be/one", &token)
            .await;

        let res = app
            .put_with_token(
                &routes::project("logo", other),
                &json!({"imageUrl": image_url}),
                &token,
            )
            .await;
        assert_eq!(res.status, 409, "{}", res.text);
        assert_eq!(res.body["error"], "CONFLICT");

        let deleted = app
            .delete_with_token(&routes::project("logo", other), &token)
            .await;
        assert_eq!(deleted.status, 200);
        let still_served = app.client.get(&image_url).send().await.unwrap();
        assert_eq!(still_served.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn project_may_keep_its_own_file() {
        let (app, token, _) = app_with_category().await;
        let created = app.create_image_project("logo", &token).await;
        let id = created.data_id();
        let image_url = created.body["data"]["imageUrl"].as_str().unwrap();

        let res = app
            .put_with_token(
                &routes::project("logo", id),
                &json!({"imageUrl": image_url}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(app.blob_count(), 1);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deleting_a_project_removes_its_file() {
        let (app, token, _) = app_with_category().await;
        let created = app.create_image_project("logo", &token).await;
        let id = created.data_id();
        assert_eq!(app.blob_count(), 1);

        let res = app.delete_with_token(&routes::project("logo", id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Project deleted successfully");
        assert_eq!(app.blob_count(), 0);

        let list = app.get_without_token(&routes::projects_in("logo")).await;
        assert_eq!(list.body["count"], 0);
    }

    #[tokio::test]
    async fn wrong_category_is_not_found() {
        let (app, token, _) = app_with_category().await;
        app.create_category("poster", &token).await;
        let id = app
            .create_video_url_project("logo", "https://youtu.be/one", &token)
            .await;

        let res = app
            .delete_with_token(&routes::project("poster", id), &token)
            .await;

        assert_eq!(res.status, 404);
        let list = app.get_without_token(&routes::projects_in("logo")).await;
        assert_eq!(list.body["count"], 1);
    }

    #[tokio::test]
    async fn deleting_requires_authentication() {
        let (app, token, _) = app_with_category().await;
        let id = app
            .create_video_url_project("logo", "https://youtu.be/one", &token)
            .await;

        let res = app
            .client
            .delete(app.url(&routes::project("logo", id)))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 401);
    }
}
