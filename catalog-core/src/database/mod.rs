//! Persistence gateway: repository ports and their implementations.

pub mod memory;
pub mod ports;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use memory::MemoryCatalog;
use ports::{CategoryRepository, ItemRepository, MediaRepository};
use postgres::repositories::{
    PostgresCategoryRepository, PostgresItemRepository, PostgresMediaRepository,
};

/// Bundle of repository handles the rest of the system works against.
///
/// Handlers and the publish worker only see the ports; which backend sits
/// behind them is decided once at startup.
#[derive(Clone)]
pub struct CatalogStore {
    pub categories: Arc<dyn CategoryRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub items: Arc<dyn ItemRepository>,
}

impl fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogStore").finish_non_exhaustive()
    }
}

impl CatalogStore {
    /// Postgres-backed store sharing a single connection pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            media: Arc::new(PostgresMediaRepository::new(pool.clone())),
            items: Arc::new(PostgresItemRepository::new(pool)),
        }
    }

    /// In-memory store. Used by tests and `--memory` mode.
    pub fn memory() -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        Self {
            categories: catalog.clone(),
            media: catalog.clone(),
            items: catalog,
        }
    }
}
