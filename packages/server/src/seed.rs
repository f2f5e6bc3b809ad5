use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{project, service_step};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup. Failures are logged, not fatal.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Newest-first listings across all categories.
    ensure_index(
        db,
        "idx_project_created",
        Index::create()
            .if_not_exists()
            .table(project::Entity)
            .col(project::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    // Newest-first listings within one category.
    ensure_index(
        db,
        "idx_project_category_created",
        Index::create()
            .if_not_exists()
            .table(project::Entity)
            .col(project::Column::CategoryId)
            .col(project::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    ensure_index(
        db,
        "idx_service_step_category_created",
        Index::create()
            .if_not_exists()
            .table(service_step::Entity)
            .col(service_step::Column::CategoryId)
            .col(service_step::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    Ok(())
}

async fn ensure_index(db: &DatabaseConnection, name: &str, mut stmt: IndexCreateStatement) {
    let sql = stmt.name(name).to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&sql).await {
        Ok(_) => {
            info!("Ensured index {} exists", name);
        }
        Err(e) => {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }
}
