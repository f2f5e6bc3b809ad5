use thiserror::Error;

/// Failures reported by a [`BlobStore`](super::BlobStore).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("blob {0} is not in the bucket")]
    NotFound(String),
    #[error("bucket I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed blob id {0}")]
    InvalidId(String),
    /// Raised while streaming, before the blob becomes visible.
    #[error("blob of {actual} bytes is over the {limit} byte ceiling")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
