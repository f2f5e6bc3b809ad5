use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::id::BlobId;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Binary object bucket keyed by caller-supplied identifiers.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `id` and return the number of bytes written.
    async fn put(&self, id: &BlobId, data: &[u8]) -> Result<u64, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(id, reader).await
    }

    /// Store data from an async reader under `id` and return the byte count.
    ///
    /// The blob only becomes visible once the whole stream has been written.
    async fn put_stream(&self, id: &BlobId, reader: BoxReader) -> Result<u64, StorageError>;

    /// Retrieve all bytes for a blob.
    async fn get(&self, id: &BlobId) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(id).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve a blob as a streaming async reader.
    async fn get_stream(&self, id: &BlobId) -> Result<BoxReader, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, id: &BlobId) -> Result<bool, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, id: &BlobId) -> Result<bool, StorageError>;

    /// Get the size of a blob in bytes.
    async fn size(&self, id: &BlobId) -> Result<u64, StorageError>;
}
