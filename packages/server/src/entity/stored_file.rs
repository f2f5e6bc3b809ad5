use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata for a blob in the bucket. Shares its id with the blob.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stored_file")]
pub struct Model {
    /// UUIDv7 primary key, equal to the blob id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Original upload filename.
    pub filename: String,

    /// Upload kind: image or video.
    pub kind: String,

    /// Declared content type at upload time.
    pub content_type: String,

    pub size: i64,

    pub uploaded_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
