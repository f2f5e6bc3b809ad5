use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entity::{category, service_step};
use crate::error::AppError;
use crate::models::service_step::{ServiceStepRequest, ValidatedStep};
use crate::services::category::CategoryService;
use crate::utils::deadline::{LISTING, LOOKUP, bounded};

/// Service steps, always scoped to one category.
pub struct ServiceStepService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ServiceStepService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Validate the body and check that its category id names the same
    /// category as the path.
    async fn validated(
        &self,
        category_name: &str,
        req: ServiceStepRequest,
    ) -> Result<(category::Model, ValidatedStep), AppError> {
        let step = req.validate()?;
        let categories = CategoryService::new(self.conn, &[]);
        let by_name = categories.resolve_name(category_name).await?;
        let by_id = categories.find(step.category_id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::Validation("Category not found".into()),
            other => other,
        })?;

        if by_id.id != by_name.id {
            return Err(AppError::Validation(
                "Category ID does not match category name in URL".into(),
            ));
        }
        Ok((by_id, step))
    }

    async fn find_scoped(
        &self,
        id: i32,
        category_id: i32,
    ) -> Result<service_step::Model, AppError> {
        bounded(
            LOOKUP,
            service_step::Entity::find_by_id(id)
                .filter(service_step::Column::CategoryId.eq(category_id))
                .one(self.conn),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Service step not found".into()))
    }

    pub async fn add(
        &self,
        category_name: &str,
        req: ServiceStepRequest,
    ) -> Result<service_step::Model, AppError> {
        let (category, step) = self.validated(category_name, req).await?;

        let now = Utc::now();
        let model = service_step::ActiveModel {
            category_id: Set(category.id),
            title: Set(step.title),
            subtitles: Set(serde_json::to_value(&step.subtitles)
                .map_err(|e| AppError::Internal(format!("Subtitle encode error: {e}")))?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = bounded(LOOKUP, model.insert(self.conn)).await?;

        info!(step_id = created.id, category_id = category.id, "Service step added");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        category_name: &str,
        req: ServiceStepRequest,
    ) -> Result<service_step::Model, AppError> {
        let (category, step) = self.validated(category_name, req).await?;
        let existing = self.find_scoped(id, category.id).await?;

        let mut active: service_step::ActiveModel = existing.into();
        active.title = Set(step.title);
        active.subtitles = Set(serde_json::to_value(&step.subtitles)
            .map_err(|e| AppError::Internal(format!("Subtitle encode error: {e}")))?);
        active.category_id = Set(category.id);
        active.updated_at = Set(Utc::now());
        let updated = bounded(LOOKUP, active.update(self.conn)).await?;

        info!(step_id = id, "Service step updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32, category_name: &str) -> Result<(), AppError> {
        let category = CategoryService::new(self.conn, &[])
            .resolve_name(category_name)
            .await?;

        let res = bounded(
            LOOKUP,
            service_step::Entity::delete_many()
                .filter(service_step::Column::Id.eq(id))
                .filter(service_step::Column::CategoryId.eq(category.id))
                .exec(self.conn),
        )
        .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Service step not found".into()));
        }

        info!(step_id = id, category_id = category.id, "Service step deleted");
        Ok(())
    }

    pub async fn get(&self, id: i32, category_name: &str) -> Result<service_step::Model, AppError> {
        let category = CategoryService::new(self.conn, &[])
            .resolve_name(category_name)
            .await?;
        self.find_scoped(id, category.id).await
    }

    /// Steps of one category, oldest first.
    pub async fn list(&self, category_name: &str) -> Result<Vec<service_step::Model>, AppError> {
        let category = CategoryService::new(self.conn, &[])
            .resolve_name(category_name)
            .await?;
        bounded(
            LISTING,
            service_step::Entity::find()
                .filter(service_step::Column::CategoryId.eq(category.id))
                .order_by_asc(service_step::Column::CreatedAt)
                .all(self.conn),
        )
        .await
    }
}
