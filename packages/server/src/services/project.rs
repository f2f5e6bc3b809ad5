use chrono::Utc;
use common::BlobStore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::config::StorageConfig;
use crate::entity::project;
use crate::error::AppError;
use crate::models::media::Kind;
use crate::models::project::{MediaRef, ProjectResponse, UpdateProjectRequest};
use crate::services::category::CategoryService;
use crate::services::media::{MediaService, SpooledFile};
use crate::utils::deadline::{LISTING, LOOKUP, bounded};

/// Media supplied when adding a project.
pub enum NewProjectMedia {
    Upload { kind: Kind, file: SpooledFile },
    VideoUrl(String),
}

pub struct ProjectService<'a, C: ConnectionTrait> {
    conn: &'a C,
    storage: &'a StorageConfig,
    media: MediaService<'a, C>,
}

impl<'a, C: ConnectionTrait> ProjectService<'a, C> {
    pub fn new(conn: &'a C, blobs: &'a dyn BlobStore, storage: &'a StorageConfig) -> Self {
        Self {
            conn,
            storage,
            media: MediaService::new(conn, blobs, storage),
        }
    }

    fn categories(&self) -> CategoryService<'a, C> {
        CategoryService::new(self.conn, &[])
    }

    async fn respond(&self, model: &project::Model) -> Result<ProjectResponse, AppError> {
        let media_type = self.media.media_type(model).await?;
        Ok(ProjectResponse::new(model, self.storage, media_type))
    }

    async fn respond_all(&self, models: Vec<project::Model>) -> Result<Vec<ProjectResponse>, AppError> {
        let tags = self.media.media_types(&models).await?;
        Ok(models
            .iter()
            .zip(tags)
            .map(|(model, tag)| ProjectResponse::new(model, self.storage, tag))
            .collect())
    }

    /// A local reference must point at an existing file of the matching kind
    /// that no project other than `owner` already uses.
    async fn check_local(&self, media: &MediaRef, owner: Option<i32>) -> Result<(), AppError> {
        let (id, expected) = match media {
            MediaRef::Image(id) => (id, Kind::Image),
            MediaRef::Video(id) => (id, Kind::Video),
            _ => return Ok(()),
        };
        let file = self
            .media
            .find_file(id)
            .await?
            .ok_or_else(|| AppError::Validation("Referenced file does not exist".into()))?;
        if file.kind != expected.as_str() {
            return Err(AppError::Validation(format!(
                "Referenced file is a {}, not a {expected}",
                file.kind
            )));
        }

        let mut users = project::Entity::find()
            .filter(project::Column::MediaKind.eq(expected.as_str()))
            .filter(project::Column::MediaRef.eq(id.to_string()));
        if let Some(owner) = owner {
            users = users.filter(project::Column::Id.ne(owner));
        }
        if let Some(other) = bounded(LOOKUP, users.one(self.conn)).await? {
            return Err(AppError::Conflict(format!(
                "Referenced file is already used by project {}",
                other.id
            )));
        }
        Ok(())
    }

    async fn find_scoped(&self, id: i32, category_id: i32) -> Result<Option<project::Model>, AppError> {
        bounded(
            LOOKUP,
            project::Entity::find_by_id(id)
                .filter(project::Column::CategoryId.eq(category_id))
                .one(self.conn),
        )
        .await
    }

    pub async fn add(
        &self,
        category_name: &str,
        input: NewProjectMedia,
    ) -> Result<ProjectResponse, AppError> {
        let category = self.categories().resolve_name(category_name).await?;

        let media = match input {
            NewProjectMedia::Upload { kind, file } => {
                let uploaded = self.media.upload(kind, &file).await?;
                match kind {
                    Kind::Image => MediaRef::Image(uploaded.file_id),
                    Kind::Video => MediaRef::Video(uploaded.file_id),
                }
            }
            NewProjectMedia::VideoUrl(url) => {
                let media = MediaRef::video_from_url(&url, &self.storage.files_base_url)
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                self.check_local(&media, None).await?;
                media
            }
        };

        let (media_kind, media_ref) = media.to_columns();
        let now = Utc::now();
        let model = project::ActiveModel {
            category_id: Set(category.id),
            media_kind: Set(media_kind.to_string()),
            media_ref: Set(media_ref),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = bounded(LOOKUP, model.insert(self.conn)).await?;

        info!(
            project_id = created.id,
            category_id = category.id,
            media = media_kind,
            "Project added"
        );
        self.respond(&created).await
    }

    /// Replace a project's media. The project must belong to the named category.
    pub async fn update(
        &self,
        id: i32,
        category_name: &str,
        req: &UpdateProjectRequest,
    ) -> Result<ProjectResponse, AppError> {
        let category = self.categories().resolve_name(category_name).await?;
        let existing = self.find_scoped(id, category.id).await?.ok_or_else(|| {
            AppError::NotFound("Project not found or category does not match".into())
        })?;

        let media = MediaRef::from_urls(
            req.image_url.as_deref(),
            req.video_url.as_deref(),
            &self.storage.files_base_url,
        )
        .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_local(&media, Some(existing.id)).await?;

        let previous = MediaRef::from(&existing);
        let (media_kind, media_ref) = media.to_columns();
        let mut active: project::ActiveModel = existing.into();
        active.media_kind = Set(media_kind.to_string());
        active.media_ref = Set(media_ref);
        active.updated_at = Set(Utc::now());
        let updated = bounded(LOOKUP, active.update(self.conn)).await?;

        if previous.local_id() != media.local_id() {
            self.media.delete_media(&previous).await;
        }

        info!(project_id = id, media = media_kind, "Project media replaced");
        self.respond(&updated).await
    }

    /// Delete a project and, best-effort, the file it owns.
    pub async fn delete(&self, id: i32, category_name: &str) -> Result<(), AppError> {
        let category = self.categories().resolve_name(category_name).await?;
        let existing = self
            .find_scoped(id, category.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        self.media.delete_media(&MediaRef::from(&existing)).await;

        let res = bounded(LOOKUP, project::Entity::delete_by_id(id).exec(self.conn)).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        info!(project_id = id, category_id = category.id, "Project deleted");
        Ok(())
    }

    /// Every project, newest first.
    pub async fn list_all(&self) -> Result<Vec<ProjectResponse>, AppError> {
        let models = bounded(
            LISTING,
            project::Entity::find()
                .order_by_desc(project::Column::CreatedAt)
                .all(self.conn),
        )
        .await?;
        self.respond_all(models).await
    }

    pub async fn list_by_category(
        &self,
        category_name: &str,
    ) -> Result<Vec<ProjectResponse>, AppError> {
        let category = self.categories().resolve_name(category_name).await?;
        let models = bounded(
            LISTING,
            project::Entity::find()
                .filter(project::Column::CategoryId.eq(category.id))
                .order_by_desc(project::Column::CreatedAt)
                .all(self.conn),
        )
        .await?;
        self.respond_all(models).await
    }
}
