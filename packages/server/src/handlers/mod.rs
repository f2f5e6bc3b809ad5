pub mod auth;
pub mod category;
pub mod media;
pub mod project;
pub mod service_step;

use crate::error::AppError;

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}
