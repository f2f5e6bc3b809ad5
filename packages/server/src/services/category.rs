use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::info;

use crate::entity::{category, project, service_step};
use crate::error::AppError;
use crate::models::shared::normalize_category_name;
use crate::utils::deadline::{LISTING, LOOKUP, bounded};

/// CRUD over the category taxonomy.
pub struct CategoryService<'a, C: ConnectionTrait> {
    conn: &'a C,
    allowed: &'a [String],
}

fn duplicate_or(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Category already exists".into())
        }
        _ => AppError::from(e),
    }
}

impl<'a, C: ConnectionTrait> CategoryService<'a, C> {
    /// `allowed` restricts category names; an empty list accepts any name.
    pub fn new(conn: &'a C, allowed: &'a [String]) -> Self {
        Self { conn, allowed }
    }

    /// Normalise a requested name and check it against the allow-list.
    fn checked_name(&self, raw: &str) -> Result<String, AppError> {
        let name = normalize_category_name(raw);
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".into()));
        }
        if !self.allowed.is_empty()
            && !self
                .allowed
                .iter()
                .any(|a| normalize_category_name(a) == name)
        {
            return Err(AppError::Validation(format!(
                "Invalid category. Allowed categories: {}",
                self.allowed.join(", ")
            )));
        }
        Ok(name)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<category::Model>, AppError> {
        bounded(
            LOOKUP,
            category::Entity::find()
                .filter(category::Column::NameCategory.eq(name))
                .one(self.conn),
        )
        .await
    }

    pub async fn find(&self, id: i32) -> Result<category::Model, AppError> {
        bounded(LOOKUP, category::Entity::find_by_id(id).one(self.conn))
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".into()))
    }

    /// Look up a category by the name used in a URL path.
    pub async fn resolve_name(&self, raw: &str) -> Result<category::Model, AppError> {
        let name = normalize_category_name(raw);
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".into()));
        }
        self.find_by_name(&name)
            .await?
            .ok_or_else(|| AppError::Validation("Category not found".into()))
    }

    pub async fn add(&self, raw_name: &str) -> Result<category::Model, AppError> {
        let name = self.checked_name(raw_name)?;

        if self.find_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict("Category already exists".into()));
        }

        let model = category::ActiveModel {
            name_category: Set(name),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let insert = async { model.insert(self.conn).await.map_err(duplicate_or) };
        let created = bounded(LOOKUP, insert).await?;

        info!(category_id = created.id, name = %created.name_category, "Category added");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<category::Model>, AppError> {
        bounded(
            LISTING,
            category::Entity::find()
                .order_by_asc(category::Column::Id)
                .all(self.conn),
        )
        .await
    }

    pub async fn update(&self, id: i32, raw_name: &str) -> Result<category::Model, AppError> {
        let name = self.checked_name(raw_name)?;
        let existing = self.find(id).await?;

        if let Some(other) = self.find_by_name(&name).await?
            && other.id != id
        {
            return Err(AppError::Conflict("Category already exists".into()));
        }

        let mut active: category::ActiveModel = existing.into();
        active.name_category = Set(name);
        let update = async { active.update(self.conn).await.map_err(duplicate_or) };
        let updated = bounded(LOOKUP, update).await?;

        info!(category_id = id, name = %updated.name_category, "Category renamed");
        Ok(updated)
    }

    /// Delete a category that nothing references.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.find(id).await?;

        let projects = bounded(
            LISTING,
            project::Entity::find()
                .filter(project::Column::CategoryId.eq(id))
                .count(self.conn),
        )
        .await?;
        let steps = bounded(
            LISTING,
            service_step::Entity::find()
                .filter(service_step::Column::CategoryId.eq(id))
                .count(self.conn),
        )
        .await?;

        if projects > 0 || steps > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete category: it is used by {projects} project(s) and {steps} service step(s)"
            )));
        }

        bounded(LOOKUP, category::Entity::delete_by_id(id).exec(self.conn)).await?;
        info!(category_id = id, "Category deleted");
        Ok(())
    }
}
