use chrono::{DateTime, Utc};
use common::BlobId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StorageConfig;
use crate::entity::project;
use crate::models::media::{file_url, parse_local_file_id};

/// The single media item a project points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    None,
    Image(BlobId),
    Video(BlobId),
    ExternalVideo(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaRefError {
    #[error("A project can have either an image or a video, not both")]
    BothSet,
    #[error("imageUrl must reference an uploaded file")]
    ImageNotLocal,
    #[error("videoUrl must be an uploaded file or an http(s) link")]
    InvalidVideoUrl,
}

impl MediaRef {
    pub fn kind_tag(&self) -> &'static str {
        match self {
            MediaRef::None => "none",
            MediaRef::Image(_) => "image",
            MediaRef::Video(_) => "video",
            MediaRef::ExternalVideo(_) => "external_video",
        }
    }

    /// The stored file this reference owns, if any.
    pub fn local_id(&self) -> Option<BlobId> {
        match self {
            MediaRef::Image(id) | MediaRef::Video(id) => Some(*id),
            _ => None,
        }
    }

    /// Rebuild from the `media_kind` / `media_ref` columns.
    ///
    /// Rows are only written through `to_columns`, so an unreadable pair is
    /// treated as no media.
    pub fn from_columns(kind: &str, reference: &str) -> Self {
        match kind {
            "image" => BlobId::parse(reference).map(MediaRef::Image).unwrap_or(MediaRef::None),
            "video" => BlobId::parse(reference).map(MediaRef::Video).unwrap_or(MediaRef::None),
            "external_video" if !reference.is_empty() => {
                MediaRef::ExternalVideo(reference.to_string())
            }
            _ => MediaRef::None,
        }
    }

    pub fn to_columns(&self) -> (&'static str, String) {
        let reference = match self {
            MediaRef::None => String::new(),
            MediaRef::Image(id) | MediaRef::Video(id) => id.to_string(),
            MediaRef::ExternalVideo(url) => url.clone(),
        };
        (self.kind_tag(), reference)
    }

    /// Interpret a pair of client-supplied URLs. Empty strings count as absent.
    pub fn from_urls(
        image_url: Option<&str>,
        video_url: Option<&str>,
        files_base_url: &str,
    ) -> Result<Self, MediaRefError> {
        let image = image_url.map(str::trim).filter(|s| !s.is_empty());
        let video = video_url.map(str::trim).filter(|s| !s.is_empty());

        match (image, video) {
            (Some(_), Some(_)) => Err(MediaRefError::BothSet),
            (Some(url), None) => parse_local_file_id(url, files_base_url)
                .map(MediaRef::Image)
                .ok_or(MediaRefError::ImageNotLocal),
            (None, Some(url)) => Self::video_from_url(url, files_base_url),
            (None, None) => Ok(MediaRef::None),
        }
    }

    /// A video URL is either one of our files or an external http(s) link.
    pub fn video_from_url(url: &str, files_base_url: &str) -> Result<Self, MediaRefError> {
        let url = url.trim();
        if let Some(id) = parse_local_file_id(url, files_base_url) {
            return Ok(MediaRef::Video(id));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(MediaRef::ExternalVideo(url.to_string()))
        } else {
            Err(MediaRefError::InvalidVideoUrl)
        }
    }

    pub fn image_url(&self, storage: &StorageConfig) -> String {
        match self {
            MediaRef::Image(id) => file_url(storage, id),
            _ => String::new(),
        }
    }

    pub fn video_url(&self, storage: &StorageConfig) -> String {
        match self {
            MediaRef::Video(id) => file_url(storage, id),
            MediaRef::ExternalVideo(url) => url.clone(),
            _ => String::new(),
        }
    }
}

impl From<&project::Model> for MediaRef {
    fn from(model: &project::Model) -> Self {
        MediaRef::from_columns(&model.media_kind, &model.media_ref)
    }
}

/// Request body for replacing a project's media.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[schema(example = "http://localhost:8080/files/0190f1c2-7d3e-7abc-8def-0123456789ab")]
    pub image_url: Option<String>,
    #[schema(example = "")]
    pub video_url: Option<String>,
}

/// Multipart form accepted when adding a project. Documentation only.
#[derive(Deserialize, utoipa::ToSchema)]
#[allow(dead_code)]
pub struct AddProjectForm {
    /// `image`, `video` or `videoUrl`.
    #[serde(rename = "type")]
    #[schema(example = "image")]
    kind: String,
    /// File to upload; required for `image` and `video`.
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
    /// External video link; required for `videoUrl`.
    #[serde(rename = "videoUrl")]
    #[schema(example = "https://youtu.be/dQw4w9WgXcQ")]
    video_url: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[serde(rename = "category_id")]
    #[schema(example = 1)]
    pub category_id: i32,
    pub image_url: String,
    pub video_url: String,
    /// `image`, `video`, `youtube`, or empty when unknown.
    #[schema(example = "image")]
    pub media_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    pub fn new(model: &project::Model, storage: &StorageConfig, media_type: String) -> Self {
        let media = MediaRef::from(model);
        Self {
            id: model.id,
            category_id: model.category_id,
            image_url: media.image_url(storage),
            video_url: media.video_url(storage),
            media_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
