use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Category already exists")]
    pub message: String,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `FORBIDDEN`, `NOT_FOUND`,
    /// `CONFLICT`, `UPLOAD_INCOMPLETE`, `DEPENDENCY_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "CONFLICT")]
    pub error: &'static str,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    /// The blob reached the bucket but its metadata row was not written.
    UploadIncomplete {
        file_id: String,
        cause: String,
    },
    /// A store or bucket call failed or timed out.
    Dependency(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: msg,
                    error: "VALIDATION_ERROR",
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message: "Authentication required".into(),
                    error: "TOKEN_MISSING",
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message: "Invalid or expired token".into(),
                    error: "TOKEN_INVALID",
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message: "Invalid email or password".into(),
                    error: "INVALID_CREDENTIALS",
                },
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    message: msg,
                    error: "FORBIDDEN",
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message: msg,
                    error: "NOT_FOUND",
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    message: msg,
                    error: "CONFLICT",
                },
            ),
            AppError::UploadIncomplete { file_id, cause } => {
                tracing::error!(file_id = %file_id, "Blob stored without metadata record: {cause}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: "File upload could not be completed".into(),
                        error: "UPLOAD_INCOMPLETE",
                    },
                )
            }
            AppError::Dependency(detail) => {
                tracing::error!("Dependency error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: "A storage backend is unavailable".into(),
                        error: "DEPENDENCY_ERROR",
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: "An unexpected error occurred".into(),
                        error: "INTERNAL_ERROR",
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Dependency(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AppError::NotFound("File not found".into()),
            StorageError::InvalidId(_) => AppError::Validation("Invalid file id".into()),
            StorageError::SizeLimitExceeded { actual, limit } => AppError::Validation(format!(
                "File size {actual} exceeds the maximum of {limit} bytes"
            )),
            other => AppError::Dependency(other.to_string()),
        }
    }
}
