use std::fmt;
use std::str::FromStr;

use common::BlobId;
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;

/// Upload kind. Controls the size ceiling and the accepted content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Image,
    Video,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Image => "image",
            Kind::Video => "video",
        }
    }

    pub fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            Kind::Image => &["image/jpeg", "image/png"],
            Kind::Video => &["video/mp4", "video/webm"],
        }
    }

    pub fn max_bytes(&self, storage: &StorageConfig) -> u64 {
        match self {
            Kind::Image => storage.max_image_bytes,
            Kind::Video => storage.max_video_bytes,
        }
    }

    /// Whether a declared content type (parameters ignored) is accepted for this kind.
    pub fn accepts(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_content_types().contains(&essence.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Kind::Image),
            "video" => Ok(Kind::Video),
            other => Err(format!("Invalid file type '{other}': expected image or video")),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful upload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Retrieval URL, `<files-base>/<id>`.
    #[schema(example = "http://localhost:8080/files/0190f1c2-7d3e-7abc-8def-0123456789ab")]
    pub file_url: String,
    #[schema(value_type = String, example = "0190f1c2-7d3e-7abc-8def-0123456789ab")]
    pub file_id: BlobId,
    #[serde(rename = "type")]
    pub kind: Kind,
    #[schema(example = 48213)]
    pub size: u64,
    #[schema(example = "cover.jpg")]
    pub filename: String,
}

/// Retrieval URL for a stored file.
pub fn file_url(storage: &StorageConfig, id: &BlobId) -> String {
    format!("{}/{}", storage.files_base_url, id)
}

/// Extract the stored-file id from a media URL.
///
/// Accepts `<files-base>/<id>` or any URL whose last two path segments are
/// `files/<id>`. Anything else is an external link and yields `None`.
pub fn parse_local_file_id(url: &str, files_base_url: &str) -> Option<BlobId> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if let Some(rest) = url.strip_prefix(files_base_url)
        && let Some(id) = rest.strip_prefix('/')
        && !id.contains('/')
    {
        return BlobId::parse(id).ok();
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.trim_end_matches('/').rsplit('/');
    let id = segments.next()?;
    match segments.next() {
        Some("files") => BlobId::parse(id).ok(),
        _ => None,
    }
}

/// Whether an external link points at a recognised video host.
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}
