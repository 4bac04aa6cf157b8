//! Postgres-backed persistence gateway.

pub mod repositories;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::{CatalogError, Result};

/// Connection pool wrapper owning schema initialization.
#[derive(Clone, Debug)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Failed to connect to PostgreSQL: {e}"
                ))
            })?;
        Ok(Self { pool })
    }

    /// Applies the embedded migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Migration failed: {e}"))
            })?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
