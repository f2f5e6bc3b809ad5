use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::id::BlobId;
use super::traits::{BlobStore, BoxReader};

/// Filesystem-backed blob bucket.
///
/// Blobs are stored in a sharded directory layout:
/// `{base_path}/{last 2 hex chars of id}/{id}`
///
/// Writes go to `{base_path}/.tmp` first and are renamed into place, so a
/// reader never sees a partially written blob.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Compute the filesystem path for a given blob id.
    fn blob_path(&self, id: &BlobId) -> PathBuf {
        self.base_path.join(id.shard_prefix()).join(id.to_string())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self, id: &BlobId) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(format!("{id}-{}", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put_stream(&self, id: &BlobId, mut reader: BoxReader) -> Result<u64, StorageError> {
        let temp_path = self.temp_path(id);
        let mut total_bytes: u64 = 0;

        let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer
        let mut temp_file = fs::File::create(&temp_path).await?;

        let copied: Result<(), StorageError> = async {
            loop {
                let n = reader.read(&mut buf).await?;
                if n == 0 {
                    break;
                }

                total_bytes += n as u64;
                if total_bytes > self.max_size {
                    return Err(StorageError::SizeLimitExceeded {
                        actual: total_bytes,
                        limit: self.max_size,
                    });
                }

                temp_file.write_all(&buf[..n]).await?;
            }
            temp_file.flush().await?;
            Ok(())
        }
        .await;
        drop(temp_file);

        if let Err(e) = copied {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        let blob_path = self.blob_path(id);
        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(total_bytes)
    }

    async fn get_stream(&self, id: &BlobId) -> Result<BoxReader, StorageError> {
        let blob_path = self.blob_path(id);
        match fs::File::open(&blob_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, id: &BlobId) -> Result<bool, StorageError> {
        let blob_path = self.blob_path(id);
        Ok(fs::try_exists(&blob_path).await?)
    }

    async fn delete(&self, id: &BlobId) -> Result<bool, StorageError> {
        let blob_path = self.blob_path(id);
        match fs::remove_file(&blob_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, id: &BlobId) -> Result<u64, StorageError> {
        let blob_path = self.blob_path(id);
        match fs::metadata(&blob_path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
