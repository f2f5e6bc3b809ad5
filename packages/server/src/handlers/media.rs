use axum::body::Body;
use axum::extract::{Multipart, State, multipart::Field};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::Json;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::AppPath;
use crate::models::media::{Kind, UploadResponse};
use crate::models::shared::Envelope;
use crate::services::media::{MediaService, SpooledFile};
use crate::state::AppState;
use crate::utils::filename::content_disposition_value;

/// Stream a multipart file field to a staging file, stopping once `max_size`
/// bytes are exceeded.
pub(crate) async fn spool_field(
    mut field: Field<'_>,
    max_size: u64,
) -> Result<SpooledFile, AppError> {
    let mut spooled = SpooledFile {
        path: SpooledFile::staging_path(),
        filename: field.file_name().map(str::to_string),
        content_type: field.content_type().map(str::to_string),
        size: 0,
    };

    let mut temp_file = tokio::fs::File::create(&spooled.path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        spooled.size += chunk.len() as u64;
        if spooled.size > max_size {
            return Err(AppError::Validation(format!(
                "File too large: uploads are limited to {} MiB",
                max_size / (1024 * 1024)
            )));
        }
        temp_file
            .write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
    }

    temp_file
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

    Ok(spooled)
}

pub(crate) async fn text_field(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))
}

#[utoipa::path(
    post,
    path = "/projects/files",
    tag = "Files",
    operation_id = "uploadFile",
    summary = "Upload a media file",
    description = "Multipart fields: `file` (required) and `type` (`image` or `video`). Images \
        must be JPEG or PNG, videos MP4 or WebM. Size ceilings are configured per kind.",
    request_body(content_type = "multipart/form-data", description = "File and its kind"),
    responses(
        (status = 200, description = "File stored", body = Envelope<UploadResponse>),
        (status = 400, description = "Bad kind, size or content type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Stored without metadata (UPLOAD_INCOMPLETE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(caller = %auth_user.email))]
pub async fn upload_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<UploadResponse>>, AppError> {
    let max_size = state.config.storage.max_upload_bytes();
    let mut file: Option<SpooledFile> = None;
    let mut kind: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => file = Some(spool_field(field, max_size).await?),
            Some("type") => kind = Some(text_field(field).await?),
            _ => {}
        }
    }

    let kind: Kind = kind
        .ok_or_else(|| AppError::Validation("File type is required".into()))?
        .parse()
        .map_err(AppError::Validation)?;
    let file = file.ok_or_else(|| AppError::Validation("File is required".into()))?;

    let uploaded = MediaService::new(&state.db, &*state.blob_store, &state.config.storage)
        .upload(kind, &file)
        .await?;
    Ok(Json(Envelope::with_data("File uploaded successfully", uploaded)))
}

#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "Files",
    operation_id = "getFile",
    summary = "Stream a stored file",
    description = "Public. Content type is chosen from the stored filename's extension.",
    params(("id" = String, Path, description = "File ID (UUID)")),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_file(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Response, AppError> {
    let download = MediaService::new(&state.db, &*state.blob_store, &state.config.storage)
        .open(&id)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_LENGTH, download.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&download.filename),
        )
        .body(Body::from_stream(ReaderStream::new(download.reader)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
