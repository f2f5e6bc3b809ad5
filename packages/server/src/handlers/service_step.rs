use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::service_step::{ServiceStepRequest, ServiceStepResponse};
use crate::models::shared::{Envelope, MessageResponse};
use crate::services::service_step::ServiceStepService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/servicesteps/{category}/service-steps",
    tag = "Service Steps",
    operation_id = "listServiceSteps",
    summary = "List a category's service steps",
    params(("category" = String, Path, description = "Category name, any casing")),
    responses(
        (status = 200, description = "Service steps", body = Envelope<Vec<ServiceStepResponse>>),
        (status = 400, description = "Unknown category (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token present but invalid (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(category))]
pub async fn list_service_steps(
    _auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> Result<Json<Envelope<Vec<ServiceStepResponse>>>, AppError> {
    let steps = ServiceStepService::new(&state.db).list(&category).await?;
    Ok(Json(Envelope::list(
        "Service steps retrieved successfully",
        steps.into_iter().map(ServiceStepResponse::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/servicesteps/{category}/service-steps",
    tag = "Service Steps",
    operation_id = "addServiceStep",
    summary = "Add a service step",
    description = "`categories` must be the id of the category named in the path. Empty \
        subtitles and headings are dropped; at least one must remain.",
    params(("category" = String, Path, description = "Category name, any casing")),
    request_body = ServiceStepRequest,
    responses(
        (status = 200, description = "Service step created", body = Envelope<ServiceStepResponse>),
        (status = 400, description = "Invalid content or category mismatch (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(category))]
pub async fn add_service_step(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
    AppJson(payload): AppJson<ServiceStepRequest>,
) -> Result<Json<Envelope<ServiceStepResponse>>, AppError> {
    let step = ServiceStepService::new(&state.db)
        .add(&category, payload)
        .await?;
    Ok(Json(Envelope::with_data(
        "Service step added successfully",
        step.into(),
    )))
}

#[utoipa::path(
    get,
    path = "/servicesteps/{category}/service-steps/{step_id}",
    tag = "Service Steps",
    operation_id = "getServiceStep",
    summary = "Get a service step",
    params(
        ("category" = String, Path, description = "Category name, any casing"),
        ("step_id" = i32, Path, description = "Service step ID"),
    ),
    responses(
        (status = 200, description = "Service step", body = Envelope<ServiceStepResponse>),
        (status = 400, description = "Unknown category (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such step in this category (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(category, step_id))]
pub async fn get_service_step(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath((category, step_id)): AppPath<(String, i32)>,
) -> Result<Json<Envelope<ServiceStepResponse>>, AppError> {
    let step = ServiceStepService::new(&state.db)
        .get(step_id, &category)
        .await?;
    Ok(Json(Envelope::with_data(
        "Service step retrieved successfully",
        step.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/servicesteps/{category}/service-steps/{step_id}",
    tag = "Service Steps",
    operation_id = "updateServiceStep",
    summary = "Replace a service step",
    params(
        ("category" = String, Path, description = "Category name, any casing"),
        ("step_id" = i32, Path, description = "Service step ID"),
    ),
    request_body = ServiceStepRequest,
    responses(
        (status = 200, description = "Service step updated", body = Envelope<ServiceStepResponse>),
        (status = 400, description = "Invalid content or category mismatch (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such step in this category (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(category, step_id))]
pub async fn update_service_step(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath((category, step_id)): AppPath<(String, i32)>,
    AppJson(payload): AppJson<ServiceStepRequest>,
) -> Result<Json<Envelope<ServiceStepResponse>>, AppError> {
    let step = ServiceStepService::new(&state.db)
        .update(step_id, &category, payload)
        .await?;
    Ok(Json(Envelope::with_data(
        "Service step updated successfully",
        step.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/servicesteps/{category}/service-steps/{step_id}",
    tag = "Service Steps",
    operation_id = "deleteServiceStep",
    summary = "Delete a service step",
    params(
        ("category" = String, Path, description = "Category name, any casing"),
        ("step_id" = i32, Path, description = "Service step ID"),
    ),
    responses(
        (status = 200, description = "Service step deleted", body = MessageResponse),
        (status = 400, description = "Unknown category (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such step in this category (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(category, step_id))]
pub async fn delete_service_step(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath((category, step_id)): AppPath<(String, i32)>,
) -> Result<Json<MessageResponse>, AppError> {
    ServiceStepService::new(&state.db)
        .delete(step_id, &category)
        .await?;
    Ok(Json(MessageResponse::new("Service step deleted successfully")))
}
