use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use catalog_model::{Category, CategoryId};

use crate::database::ports::{CategoryFilter, CategoryRepository};
use crate::error::{CatalogError, Result};

#[derive(Clone, Debug)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id.as_uuid())
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to create category: {e}"))
        })?;

        Ok(())
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to get category: {e}"))
        })?;

        Ok(row.map(Category::from))
    }

    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let mut builder = QueryBuilder::new(
            "SELECT id, name, description, created_at, updated_at \
             FROM categories WHERE TRUE",
        );
        if let Some(name) = &filter.name {
            builder.push(" AND name = ").push_bind(name);
        }
        if let Some(q) = &filter.q {
            let pattern = format!("%{q}%");
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY created_at, id");

        let rows: Vec<CategoryRow> = builder
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Failed to list categories: {e}"
                ))
            })?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update(&self, category: Category) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(category.id.as_uuid())
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to update category: {e}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!(
                "Category {} not found",
                category.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: CategoryId) -> Result<()> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM items WHERE category_id = $1)",
        )
        .bind(id.as_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!(
                "Failed to check category references: {e}"
            ))
        })?;

        if referenced {
            return Err(CatalogError::Conflict(format!(
                "Category {id} is referenced by existing items"
            )));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Failed to delete category: {e}"
                ))
            })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!(
                "Category {id} not found"
            )));
        }
        Ok(())
    }
}
