use serde::{Deserialize, Serialize};

use crate::entity::category;

/// Request body for creating or renaming a category.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryRequest {
    /// Any casing; stored title-cased ("visual motion" becomes "Visual Motion").
    #[schema(example = "visual motion")]
    pub name_category: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Visual Motion")]
    pub name_category: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name_category: model.name_category,
        }
    }
}
