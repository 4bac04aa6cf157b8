use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use catalog_model::{Item, ItemCondition, ItemId, ItemStatus, MediaId};

use crate::database::ports::{ItemFilter, ItemPage, ItemRepository, Page};
use crate::error::{CatalogError, Result};

#[derive(Clone, Debug)]
pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Existence checks for the category and media references. Runs inside
    /// the write transaction so the checks and the write see one snapshot.
    async fn check_references(
        tx: &mut Transaction<'_, Postgres>,
        item: &Item,
    ) -> Result<()> {
        let category_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(item.category_id.as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to check category: {e}"))
        })?;

        if !category_exists {
            return Err(CatalogError::NotFound(format!(
                "Category {} not found",
                item.category_id
            )));
        }

        if item.media_ids.is_empty() {
            return Ok(());
        }

        let wanted: Vec<Uuid> =
            item.media_ids.iter().map(MediaId::to_uuid).collect();
        let found: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM media WHERE id = ANY($1)")
                .bind(&wanted)
                .fetch_all(&mut **tx)
                .await
                .map_err(|e| {
                    CatalogError::Internal(format!(
                        "Failed to check media references: {e}"
                    ))
                })?;

        let found: HashSet<Uuid> = found.into_iter().collect();
        if let Some(missing) =
            wanted.iter().find(|id| !found.contains(id))
        {
            return Err(CatalogError::NotFound(format!(
                "Media {missing} not found"
            )));
        }
        Ok(())
    }

    async fn insert_media_links(
        tx: &mut Transaction<'_, Postgres>,
        item: &Item,
    ) -> Result<()> {
        if item.media_ids.is_empty() {
            return Ok(());
        }
        let media_ids: Vec<Uuid> =
            item.media_ids.iter().map(MediaId::to_uuid).collect();
        sqlx::query(
            r#"
            INSERT INTO item_media (item_id, media_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&media_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            CatalogError::Internal(format!(
                "Failed to link item media: {e}"
            ))
        })?;
        Ok(())
    }

    async fn media_ids_for(
        &self,
        item_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<MediaId>>> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT item_id, media_id
            FROM item_media
            WHERE item_id = ANY($1)
            ORDER BY media_id
            "#,
        )
        .bind(item_ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!(
                "Failed to fetch item media links: {e}"
            ))
        })?;

        let mut map: HashMap<Uuid, Vec<MediaId>> = HashMap::new();
        for (item_id, media_id) in rows {
            map.entry(item_id).or_default().push(MediaId(media_id));
        }
        Ok(map)
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    description: String,
    status: String,
    condition: String,
    price: Decimal,
    category_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ItemRow {
    fn into_item(self, media_ids: Vec<MediaId>) -> Result<Item> {
        let status = ItemStatus::parse(&self.status).ok_or_else(|| {
            CatalogError::Internal(format!(
                "Unknown item status in storage: {}",
                self.status
            ))
        })?;
        let condition =
            ItemCondition::parse(&self.condition).ok_or_else(|| {
                CatalogError::Internal(format!(
                    "Unknown item condition in storage: {}",
                    self.condition
                ))
            })?;
        Ok(Item {
            id: ItemId(self.id),
            name: self.name,
            description: self.description,
            status,
            condition,
            price: self.price,
            category_id: catalog_model::CategoryId(self.category_id),
            media_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ITEM_COLUMNS: &str = "i.id, i.name, i.description, i.status, \
     i.condition, i.price, i.category_id, i.created_at, i.updated_at";

fn apply_item_filters<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    filter: &'a ItemFilter,
) {
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        builder
            .push(" AND (i.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR i.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(condition) = filter.condition {
        builder
            .push(" AND i.condition = ")
            .push_bind(condition.as_str());
    }
    if let Some(status) = filter.status {
        builder.push(" AND i.status = ").push_bind(status.as_str());
    }
    if let Some(category_name) = &filter.category_name {
        builder.push(" AND c.name = ").push_bind(category_name);
    }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    async fn create(&self, item: Item) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to begin transaction: {e}"))
        })?;

        Self::check_references(&mut tx, &item).await?;

        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, description, status, condition, price,
                category_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.condition.as_str())
        .bind(item.price)
        .bind(item.category_id.as_uuid())
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to create item: {e}"))
        })?;

        Self::insert_media_links(&mut tx, &item).await?;

        tx.commit().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to commit item: {e}"))
        })
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>> {
        let sql =
            format!("SELECT {ITEM_COLUMNS} FROM items i WHERE i.id = $1");
        let row: Option<ItemRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to get item: {e}"))
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut links = self.media_ids_for(&[row.id]).await?;
        let media_ids = links.remove(&row.id).unwrap_or_default();
        row.into_item(media_ids).map(Some)
    }

    async fn list(&self, filter: &ItemFilter, page: Page) -> Result<ItemPage> {
        let mut count_builder = QueryBuilder::new(
            "SELECT COUNT(*) FROM items i \
             JOIN categories c ON c.id = i.category_id WHERE TRUE",
        );
        apply_item_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to count items: {e}"))
            })?;

        let mut builder = QueryBuilder::new(format!(
            "SELECT {ITEM_COLUMNS} FROM items i \
             JOIN categories c ON c.id = i.category_id WHERE TRUE"
        ));
        apply_item_filters(&mut builder, filter);
        builder
            .push(" ORDER BY i.created_at, i.id LIMIT ")
            .push_bind(i64::from(page.page_size))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows: Vec<ItemRow> = builder
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to list items: {e}"))
            })?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut links = self.media_ids_for(&ids).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let media_ids = links.remove(&row.id).unwrap_or_default();
            items.push(row.into_item(media_ids)?);
        }

        Ok(ItemPage {
            items,
            total: total as u64,
        })
    }

    async fn update(&self, item: Item) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to begin transaction: {e}"))
        })?;

        Self::check_references(&mut tx, &item).await?;

        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = $2, description = $3, status = $4, condition = $5,
                price = $6, category_id = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.condition.as_str())
        .bind(item.price)
        .bind(item.category_id.as_uuid())
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to update item: {e}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!(
                "Item {} not found",
                item.id
            )));
        }

        sqlx::query("DELETE FROM item_media WHERE item_id = $1")
            .bind(item.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Failed to clear item media links: {e}"
                ))
            })?;
        Self::insert_media_links(&mut tx, &item).await?;

        tx.commit().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to commit item: {e}"))
        })
    }

    async fn delete(&self, id: ItemId) -> Result<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to delete item: {e}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("Item {id} not found")));
        }
        Ok(())
    }
}
