use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use common::{BlobId, BlobStore, BoxReader};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::entity::{project, stored_file};
use crate::error::AppError;
use crate::models::media::{Kind, UploadResponse, file_url, is_youtube_url};
use crate::models::project::MediaRef;
use crate::utils::deadline::{LOOKUP, LISTING, TRANSFER, bounded};
use crate::utils::filename::{mime_for_filename, validate_flat_filename};

/// An uploaded file staged on local disk. The file is removed on drop.
#[derive(Debug)]
pub struct SpooledFile {
    pub path: PathBuf,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: u64,
}

impl SpooledFile {
    /// Fresh path for a staging file in the system temp directory.
    pub fn staging_path() -> PathBuf {
        std::env::temp_dir().join(format!("folio-upload-{}", Uuid::new_v4()))
    }

    /// Stage an in-memory payload.
    pub async fn from_bytes(
        bytes: &[u8],
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> std::io::Result<Self> {
        let path = Self::staging_path();
        tokio::fs::write(&path, bytes).await?;
        Ok(Self {
            path,
            filename: filename.map(str::to_string),
            content_type: content_type.map(str::to_string),
            size: bytes.len() as u64,
        })
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), "Failed to remove staged upload: {e}");
        }
    }
}

/// An open blob ready to be streamed to the client.
pub struct FileDownload {
    pub reader: BoxReader,
    pub filename: String,
    pub content_type: &'static str,
    pub size: u64,
}

/// Upload, download and deletion of media files and their metadata rows.
pub struct MediaService<'a, C: ConnectionTrait> {
    conn: &'a C,
    blobs: &'a dyn BlobStore,
    storage: &'a StorageConfig,
}

impl<'a, C: ConnectionTrait> MediaService<'a, C> {
    pub fn new(conn: &'a C, blobs: &'a dyn BlobStore, storage: &'a StorageConfig) -> Self {
        Self {
            conn,
            blobs,
            storage,
        }
    }

    /// Validate a staged file, write it to the bucket, then record its metadata.
    ///
    /// Nothing is written unless size, content type and filename all pass.
    pub async fn upload(&self, kind: Kind, file: &SpooledFile) -> Result<UploadResponse, AppError> {
        let limit = kind.max_bytes(self.storage);
        if file.size > limit {
            return Err(AppError::Validation(format!(
                "File too large: {kind} uploads are limited to {} MiB",
                limit / (1024 * 1024)
            )));
        }

        let content_type = file.content_type.as_deref().unwrap_or_default();
        if !kind.accepts(content_type) {
            return Err(AppError::Validation(format!(
                "Invalid file type for {kind}. Allowed types: {}",
                kind.allowed_content_types().join(", ")
            )));
        }

        let filename = file
            .filename
            .as_deref()
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
        let filename = validate_flat_filename(filename)
            .map_err(|e| AppError::Validation(e.message().into()))?
            .to_string();

        let id = BlobId::generate();
        let reader: BoxReader = Box::new(
            tokio::fs::File::open(&file.path)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to reopen staged upload: {e}")))?,
        );
        let size = bounded(TRANSFER, self.blobs.put_stream(&id, reader)).await?;

        let record = stored_file::ActiveModel {
            id: Set(*id.as_uuid()),
            filename: Set(filename.clone()),
            kind: Set(kind.as_str().to_string()),
            content_type: Set(content_type.to_string()),
            size: Set(i64::try_from(size).unwrap_or(i64::MAX)),
            uploaded_at: Set(Utc::now()),
        };
        if let Err(e) = bounded(LOOKUP, stored_file::Entity::insert(record).exec(self.conn)).await {
            return Err(AppError::UploadIncomplete {
                file_id: id.to_string(),
                cause: format!("{e:?}"),
            });
        }

        info!(file_id = %id, %kind, size, "File uploaded");
        Ok(UploadResponse {
            file_url: file_url(self.storage, &id),
            file_id: id,
            kind,
            size,
            filename,
        })
    }

    /// Open a stored file for streaming.
    pub async fn open(&self, raw_id: &str) -> Result<FileDownload, AppError> {
        let id = BlobId::parse(raw_id)
            .map_err(|_| AppError::Validation("Invalid file ID".into()))?;

        let reader = bounded(TRANSFER, self.blobs.get_stream(&id)).await?;
        let size = bounded(TRANSFER, self.blobs.size(&id)).await?;
        let filename = self
            .find_file(&id)
            .await?
            .map(|f| f.filename)
            .unwrap_or_else(|| id.to_string());

        Ok(FileDownload {
            reader,
            content_type: mime_for_filename(&filename),
            filename,
            size,
        })
    }

    pub async fn find_file(&self, id: &BlobId) -> Result<Option<stored_file::Model>, AppError> {
        bounded(
            LOOKUP,
            stored_file::Entity::find_by_id(*id.as_uuid()).one(self.conn),
        )
        .await
    }

    /// Remove the file a media reference owns. External links are left alone.
    pub async fn delete_media(&self, media: &MediaRef) {
        if let Some(id) = media.local_id() {
            self.delete_file(&id).await;
        }
    }

    /// Best-effort removal of a blob and its metadata row. Either being absent
    /// already counts as success.
    pub async fn delete_file(&self, id: &BlobId) {
        match bounded(TRANSFER, self.blobs.delete(id)).await {
            Ok(true) => debug!(file_id = %id, "Blob deleted"),
            Ok(false) => debug!(file_id = %id, "Blob already absent"),
            Err(e) => warn!(file_id = %id, "Blob delete failed: {e:?}"),
        }

        match bounded(
            LOOKUP,
            stored_file::Entity::delete_by_id(*id.as_uuid()).exec(self.conn),
        )
        .await
        {
            Ok(res) if res.rows_affected == 0 => {
                debug!(file_id = %id, "Metadata row already absent")
            }
            Ok(_) => info!(file_id = %id, "File deleted"),
            Err(e) => warn!(file_id = %id, "Metadata delete failed: {e:?}"),
        }
    }

    /// `mediaType` tag for each project, in input order.
    pub async fn media_types(&self, projects: &[project::Model]) -> Result<Vec<String>, AppError> {
        let refs: Vec<MediaRef> = projects.iter().map(MediaRef::from).collect();
        let ids: Vec<Uuid> = refs
            .iter()
            .filter_map(MediaRef::local_id)
            .map(Uuid::from)
            .collect();

        let kinds: HashMap<Uuid, String> = if ids.is_empty() {
            HashMap::new()
        } else {
            bounded(
                LISTING,
                stored_file::Entity::find()
                    .filter(stored_file::Column::Id.is_in(ids))
                    .all(self.conn),
            )
            .await?
            .into_iter()
            .map(|f| (f.id, f.kind))
            .collect()
        };

        Ok(refs.iter().map(|media| describe(media, &kinds)).collect())
    }

    pub async fn media_type(&self, project: &project::Model) -> Result<String, AppError> {
        let mut tags = self.media_types(std::slice::from_ref(project)).await?;
        Ok(tags.pop().unwrap_or_default())
    }
}

fn describe(media: &MediaRef, kinds: &HashMap<Uuid, String>) -> String {
    match media {
        MediaRef::ExternalVideo(url) if is_youtube_url(url) => "youtube".into(),
        MediaRef::Image(id) | MediaRef::Video(id) => {
            kinds.get(id.as_uuid()).cloned().unwrap_or_default()
        }
        _ => String::new(),
    }
}
