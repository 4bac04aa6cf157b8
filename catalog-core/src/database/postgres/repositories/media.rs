use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use catalog_model::{Media, MediaId, MediaType};

use crate::database::ports::{MediaFilter, MediaRepository};
use crate::error::{CatalogError, Result};

#[derive(Clone, Debug)]
pub struct PostgresMediaRepository {
    pool: PgPool,
}

impl PostgresMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct MediaRow {
    id: Uuid,
    url: String,
    media_type: String,
    alt_text: Option<String>,
    is_primary: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MediaRow> for Media {
    type Error = CatalogError;

    fn try_from(row: MediaRow) -> Result<Self> {
        let media_type =
            MediaType::parse(&row.media_type).ok_or_else(|| {
                CatalogError::Internal(format!(
                    "Unknown media type in storage: {}",
                    row.media_type
                ))
            })?;
        Ok(Media {
            id: MediaId(row.id),
            url: row.url,
            media_type,
            alt_text: row.alt_text,
            is_primary: row.is_primary,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl MediaRepository for PostgresMediaRepository {
    async fn create(&self, media: Media) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO media (id, url, media_type, alt_text, is_primary, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(media.id.as_uuid())
        .bind(&media.url)
        .bind(media.media_type.as_str())
        .bind(&media.alt_text)
        .bind(media.is_primary)
        .bind(media.created_at)
        .bind(media.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to create media: {e}"))
        })?;

        Ok(())
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        let row: Option<MediaRow> = sqlx::query_as(
            r#"
            SELECT id, url, media_type, alt_text, is_primary, created_at, updated_at
            FROM media
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to get media: {e}"))
        })?;

        row.map(Media::try_from).transpose()
    }

    async fn list(&self, filter: &MediaFilter) -> Result<Vec<Media>> {
        let mut builder = QueryBuilder::new(
            "SELECT id, url, media_type, alt_text, is_primary, created_at, updated_at \
             FROM media WHERE TRUE",
        );
        if let Some(media_type) = filter.media_type {
            builder
                .push(" AND media_type = ")
                .push_bind(media_type.as_str());
        }
        if let Some(is_primary) = filter.is_primary {
            builder.push(" AND is_primary = ").push_bind(is_primary);
        }
        builder.push(" ORDER BY created_at, id");

        let rows: Vec<MediaRow> = builder
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to list media: {e}"))
            })?;

        rows.into_iter().map(Media::try_from).collect()
    }

    async fn update(&self, media: Media) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE media
            SET url = $2, media_type = $3, alt_text = $4, is_primary = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(media.id.as_uuid())
        .bind(&media.url)
        .bind(media.media_type.as_str())
        .bind(&media.alt_text)
        .bind(media.is_primary)
        .bind(media.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to update media: {e}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!(
                "Media {} not found",
                media.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: MediaId) -> Result<()> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM item_media WHERE media_id = $1)",
        )
        .bind(id.as_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!(
                "Failed to check media references: {e}"
            ))
        })?;

        if referenced {
            return Err(CatalogError::Conflict(format!(
                "Media {id} is referenced by existing items"
            )));
        }

        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to delete media: {e}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("Media {id} not found")));
        }
        Ok(())
    }
}
