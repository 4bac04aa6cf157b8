//! Repository ports for the persistence gateway.
//!
//! Referential rules live behind these traits: an item may only reference
//! categories and media that exist, and a category or media entry in use by
//! an item cannot be deleted.

use async_trait::async_trait;

use catalog_model::{
    Category, CategoryId, Item, ItemCondition, ItemId, ItemStatus, Media,
    MediaId, MediaType,
};

use crate::error::Result;

/// Filter for category listings.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    /// Exact name match.
    pub name: Option<String>,
    /// Case-insensitive substring search over name and description.
    pub q: Option<String>,
}

/// Filter for media listings.
#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub media_type: Option<MediaType>,
    pub is_primary: Option<bool>,
}

/// Filter for item listings.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring search over name and description.
    pub q: Option<String>,
    pub condition: Option<ItemCondition>,
    /// Exact match on the owning category's name.
    pub category_name: Option<String>,
    pub status: Option<ItemStatus>,
}

/// 1-based pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// One page of items plus the unpaginated total.
#[derive(Debug, Clone)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total: u64,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: Category) -> Result<()>;

    async fn get(&self, id: CategoryId) -> Result<Option<Category>>;

    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>>;

    /// Full-row write. Fails `NotFound` if the category no longer exists.
    async fn update(&self, category: Category) -> Result<()>;

    /// Fails `Conflict` while any item references the category.
    async fn delete(&self, id: CategoryId) -> Result<()>;
}

#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn create(&self, media: Media) -> Result<()>;

    async fn get(&self, id: MediaId) -> Result<Option<Media>>;

    async fn list(&self, filter: &MediaFilter) -> Result<Vec<Media>>;

    async fn update(&self, media: Media) -> Result<()>;

    /// Fails `Conflict` while any item references the media entry.
    async fn delete(&self, id: MediaId) -> Result<()>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Fails `NotFound` if the category or any media reference does not
    /// resolve. Checks precede the write.
    async fn create(&self, item: Item) -> Result<()>;

    async fn get(&self, id: ItemId) -> Result<Option<Item>>;

    async fn list(&self, filter: &ItemFilter, page: Page) -> Result<ItemPage>;

    /// Full-row write with the same referential checks as `create`. Fails
    /// `NotFound` if the item itself has disappeared.
    async fn update(&self, item: Item) -> Result<()>;

    async fn delete(&self, id: ItemId) -> Result<()>;
}
