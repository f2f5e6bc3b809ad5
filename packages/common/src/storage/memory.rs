use std::collections::HashMap;
use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::id::BlobId;
use super::traits::{BlobStore, BoxReader};

/// In-process blob bucket. Used by tests and local tooling.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<BlobId, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_stream(&self, id: &BlobId, mut reader: BoxReader) -> Result<u64, StorageError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        let len = buf.len() as u64;
        self.blobs.write().await.insert(*id, buf);
        Ok(len)
    }

    async fn get_stream(&self, id: &BlobId) -> Result<BoxReader, StorageError> {
        let blobs = self.blobs.read().await;
        let data = blobs
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Ok(Box::new(Cursor::new(data)))
    }

    async fn exists(&self, id: &BlobId) -> Result<bool, StorageError> {
        Ok(self.blobs.read().await.contains_key(id))
    }

    async fn delete(&self, id: &BlobId) -> Result<bool, StorageError> {
        Ok(self.blobs.write().await.remove(id).is_some())
    }

    async fn size(&self, id: &BlobId) -> Result<u64, StorageError> {
        self.blobs
            .read()
            .await
            .get(id)
            .map(|b| b.len() as u64)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
