use axum::extract::{Multipart, State};
use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::handlers::media::{spool_field, text_field};
use crate::models::media::Kind;
use crate::models::project::{AddProjectForm, ProjectResponse, UpdateProjectRequest};
use crate::models::shared::{Envelope, MessageResponse};
use crate::services::media::SpooledFile;
use crate::services::project::{NewProjectMedia, ProjectService};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/projects",
    tag = "Projects",
    operation_id = "listProjects",
    summary = "List all projects",
    description = "Newest first. Each project carries a `mediaType` tag.",
    responses(
        (status = 200, description = "All projects", body = Envelope<Vec<ProjectResponse>>),
        (status = 401, description = "Token present but invalid (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_projects(
    _auth_user: Option<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<ProjectResponse>>>, AppError> {
    let projects = ProjectService::new(&state.db, &*state.blob_store, &state.config.storage)
        .list_all()
        .await?;
    Ok(Json(Envelope::list("Projects retrieved successfully", projects)))
}

#[utoipa::path(
    get,
    path = "/projects/{category}",
    tag = "Projects",
    operation_id = "listProjectsByCategory",
    summary = "List projects of a category",
    params(("category" = String, Path, description = "Category name, any casing")),
    responses(
        (status = 200, description = "Projects in the category", body = Envelope<Vec<ProjectResponse>>),
        (status = 400, description = "Unknown category (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token present but invalid (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(category))]
pub async fn list_projects_by_category(
    _auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> Result<Json<Envelope<Vec<ProjectResponse>>>, AppError> {
    let projects = ProjectService::new(&state.db, &*state.blob_store, &state.config.storage)
        .list_by_category(&category)
        .await?;
    Ok(Json(Envelope::list("Projects retrieved successfully", projects)))
}

#[utoipa::path(
    post,
    path = "/projects/{category}",
    tag = "Projects",
    operation_id = "addProject",
    summary = "Add a project",
    description = "Multipart form. Supply either `file` with `type` = `image` or `video`, or \
        `videoUrl` (with `type` = `videoUrl` or omitted). Exactly one media source is accepted.",
    params(("category" = String, Path, description = "Category name, any casing")),
    request_body(content = AddProjectForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Project created", body = Envelope<ProjectResponse>),
        (status = 400, description = "Unknown category or invalid media (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Stored without metadata (UPLOAD_INCOMPLETE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(category, caller = %auth_user.email))]
pub async fn add_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<ProjectResponse>>, AppError> {
    let max_size = state.config.storage.max_upload_bytes();
    let mut upload_type: Option<String> = None;
    let mut file: Option<SpooledFile> = None;
    let mut video_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("type") => upload_type = Some(text_field(field).await?),
            Some("file") => file = Some(spool_field(field, max_size).await?),
            Some("videoUrl") => {
                video_url = Some(text_field(field).await?).filter(|u| !u.trim().is_empty())
            }
            _ => {}
        }
    }

    let input = project_media(upload_type.as_deref(), file, video_url)?;
    let created = ProjectService::new(&state.db, &*state.blob_store, &state.config.storage)
        .add(&category, input)
        .await?;
    Ok(Json(Envelope::with_data("Project created successfully", created)))
}

/// Decide which media source a project form supplies.
fn project_media(
    upload_type: Option<&str>,
    file: Option<SpooledFile>,
    video_url: Option<String>,
) -> Result<NewProjectMedia, AppError> {
    let upload_type = upload_type.map(str::trim).filter(|t| !t.is_empty());
    match (upload_type, file, video_url) {
        (_, Some(_), Some(_)) => Err(AppError::Validation(
            "Provide either a file or a video URL, not both".into(),
        )),
        (None | Some("videoUrl"), None, Some(url)) => Ok(NewProjectMedia::VideoUrl(url)),
        (Some(t), Some(file), None) if t != "videoUrl" => {
            let kind: Kind = t.parse().map_err(AppError::Validation)?;
            Ok(NewProjectMedia::Upload { kind, file })
        }
        (None, Some(_), None) => Err(AppError::Validation("File type is required".into())),
        (_, None, None) => Err(AppError::Validation(
            "No file or video URL provided".into(),
        )),
        _ => Err(AppError::Validation(
            "Invalid or missing upload type or video URL".into(),
        )),
    }
}

#[utoipa::path(
    put,
    path = "/projects/{category}/{id}",
    tag = "Projects",
    operation_id = "updateProject",
    summary = "Replace a project's media",
    description = "The project must belong to the category in the path. At most one of \
        `imageUrl` and `videoUrl` may be non-empty; both empty clears the media. A replaced \
        local file is deleted.",
    params(
        ("category" = String, Path, description = "Category name, any casing"),
        ("id" = i32, Path, description = "Project ID"),
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Envelope<ProjectResponse>),
        (status = 400, description = "Invalid media or unknown category (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such project in this category (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(category, id))]
pub async fn update_project(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath((category, id)): AppPath<(String, i32)>,
    AppJson(payload): AppJson<UpdateProjectRequest>,
) -> Result<Json<Envelope<ProjectResponse>>, AppError> {
    let updated = ProjectService::new(&state.db, &*state.blob_store, &state.config.storage)
        .update(id, &category, &payload)
        .await?;
    Ok(Json(Envelope::with_data("Project updated successfully", updated)))
}

#[utoipa::path(
    delete,
    path = "/projects/{category}/{id}",
    tag = "Projects",
    operation_id = "deleteProject",
    summary = "Delete a project",
    description = "Also deletes the project's uploaded file, if any.",
    params(
        ("category" = String, Path, description = "Category name, any casing"),
        ("id" = i32, Path, description = "Project ID"),
    ),
    responses(
        (status = 200, description = "Project deleted", body = MessageResponse),
        (status = 400, description = "Unknown category (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such project in this category (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(category, id))]
pub async fn delete_project(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath((category, id)): AppPath<(String, i32)>,
) -> Result<Json<MessageResponse>, AppError> {
    ProjectService::new(&state.db, &*state.blob_store, &state.config.storage)
        .delete(id, &category)
        .await?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
