use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::service_step::{self, Subtitle};
use crate::error::AppError;

/// Request body for creating or replacing a service step.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(default)]
pub struct ServiceStepRequest {
    /// Id of the owning category, as a string. Must name the same category as the URL.
    #[schema(example = "1")]
    pub categories: String,
    #[schema(example = "Our process")]
    pub title: String,
    pub subtitles: Vec<Subtitle>,
}

/// A request that passed field validation.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedStep {
    pub category_id: i32,
    pub title: String,
    pub subtitles: Vec<Subtitle>,
}

impl ServiceStepRequest {
    pub fn validate(self) -> Result<ValidatedStep, AppError> {
        let categories = self.categories.trim();
        if categories.is_empty() {
            return Err(AppError::Validation("Categories field is required".into()));
        }

        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Service step title is required".into()));
        }

        let subtitles = clean_subtitles(self.subtitles);
        if subtitles.is_empty() {
            return Err(AppError::Validation(
                "At least one subtitle or heading is required".into(),
            ));
        }

        let category_id = categories
            .parse::<i32>()
            .map_err(|_| AppError::Validation("Invalid categories ID".into()))?;

        Ok(ValidatedStep {
            category_id,
            title: title.to_string(),
            subtitles,
        })
    }
}

/// Trim every entry, drop empty headings, and drop subtitles left with
/// neither text nor headings.
pub fn clean_subtitles(subtitles: Vec<Subtitle>) -> Vec<Subtitle> {
    subtitles
        .into_iter()
        .map(|s| Subtitle {
            text: s.text.trim().to_string(),
            headings: s
                .headings
                .into_iter()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect(),
        })
        .filter(|s| !s.text.is_empty() || !s.headings.is_empty())
        .collect()
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStepResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[serde(rename = "category_id")]
    #[schema(example = 1)]
    pub category_id: i32,
    #[schema(example = "Our process")]
    pub title: String,
    pub subtitles: Vec<Subtitle>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<service_step::Model> for ServiceStepResponse {
    fn from(model: service_step::Model) -> Self {
        let subtitles = model.subtitle_list();
        Self {
            id: model.id,
            category_id: model.category_id,
            title: model.title,
            subtitles,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
