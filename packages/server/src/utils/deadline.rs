use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Single-row reads and writes.
pub const LOOKUP: Duration = Duration::from_secs(5);
/// List and count queries.
pub const LISTING: Duration = Duration::from_secs(10);
/// Blob writes, reads and deletes.
pub const TRANSFER: Duration = Duration::from_secs(30);

/// Run a store or bucket call, failing with `Dependency` once `limit` elapses.
pub async fn bounded<T, E, F>(limit: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    AppError: From<E>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Dependency(format!(
            "operation timed out after {}s",
            limit.as_secs()
        ))),
    }
}
