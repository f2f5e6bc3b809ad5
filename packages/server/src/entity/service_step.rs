use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One content entry of a service step.
/// Stored as JSON array in the database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Subtitle {
    #[schema(example = "Briefing")]
    pub text: String,
    #[schema(example = json!(["Collect requirements", "Agree on scope"]))]
    pub headings: Vec<String>,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_step")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,

    pub title: String,

    /// JSON array of {text, headings} objects.
    #[sea_orm(column_type = "JsonBinary")]
    pub subtitles: serde_json::Value,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Decode the stored subtitles. Rows written by this server always decode.
    pub fn subtitle_list(&self) -> Vec<Subtitle> {
        serde_json::from_value(self.subtitles.clone()).unwrap_or_default()
    }
}

impl ActiveModelBehavior for ActiveModel {}
