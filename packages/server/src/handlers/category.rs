use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::category::{CategoryRequest, CategoryResponse};
use crate::models::shared::{Envelope, MessageResponse};
use crate::services::category::CategoryService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/projects/categories",
    tag = "Categories",
    operation_id = "addCategory",
    summary = "Create a category",
    description = "The name is normalised (trimmed, whitespace collapsed, title-cased) before \
        the uniqueness and allow-list checks.",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = Envelope<CategoryResponse>),
        (status = 400, description = "Empty or disallowed name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Category already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(name = %payload.name_category))]
pub async fn add_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<Json<Envelope<CategoryResponse>>, AppError> {
    let created = CategoryService::new(&state.db, &state.config.categories.allowed)
        .add(&payload.name_category)
        .await?;
    Ok(Json(Envelope::with_data(
        "Category created successfully",
        created.into(),
    )))
}

#[utoipa::path(
    get,
    path = "/projects/categories",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List categories",
    responses(
        (status = 200, description = "All categories", body = Envelope<Vec<CategoryResponse>>),
        (status = 401, description = "Token present but invalid (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_categories(
    _auth_user: Option<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<CategoryResponse>>>, AppError> {
    let categories = CategoryService::new(&state.db, &state.config.categories.allowed)
        .list()
        .await?;
    Ok(Json(Envelope::list(
        "Categories retrieved successfully",
        categories.into_iter().map(CategoryResponse::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/projects/categories/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Rename a category",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = Envelope<CategoryResponse>),
        (status = 400, description = "Empty or disallowed name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name taken by another category (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id))]
pub async fn update_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<Json<Envelope<CategoryResponse>>, AppError> {
    let updated = CategoryService::new(&state.db, &state.config.categories.allowed)
        .update(id, &payload.name_category)
        .await?;
    Ok(Json(Envelope::with_data(
        "Category updated successfully",
        updated.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/projects/categories/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Refused while any project or service step still references the category.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Category still in use (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn delete_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    CategoryService::new(&state.db, &state.config.categories.allowed)
        .delete(id)
        .await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
