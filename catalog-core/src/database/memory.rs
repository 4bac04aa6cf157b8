//! In-memory persistence gateway.
//!
//! Backs tests and `--memory` mode with the same referential semantics as
//! the Postgres gateway. All three ports are implemented on one struct so
//! cross-entity checks (item -> category, item -> media) see one source of
//! truth.

use async_trait::async_trait;
use dashmap::DashMap;

use catalog_model::{Category, CategoryId, Item, ItemId, Media, MediaId};

use crate::database::ports::{
    CategoryFilter, CategoryRepository, ItemFilter, ItemPage, ItemRepository,
    MediaFilter, MediaRepository, Page,
};
use crate::error::{CatalogError, Result};

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    categories: DashMap<CategoryId, Category>,
    media: DashMap<MediaId, Media>,
    items: DashMap<ItemId, Item>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_item_references(&self, item: &Item) -> Result<()> {
        if !self.categories.contains_key(&item.category_id) {
            return Err(CatalogError::NotFound(format!(
                "Category {} not found",
                item.category_id
            )));
        }
        for media_id in &item.media_ids {
            if !self.media.contains_key(media_id) {
                return Err(CatalogError::NotFound(format!(
                    "Media {media_id} not found"
                )));
            }
        }
        Ok(())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CategoryRepository for MemoryCatalog {
    async fn create(&self, category: Category) -> Result<()> {
        self.categories.insert(category.id, category);
        Ok(())
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.categories.get(&id).map(|entry| entry.clone()))
    }

    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let mut results: Vec<Category> = self
            .categories
            .iter()
            .filter(|entry| {
                filter
                    .name
                    .as_ref()
                    .is_none_or(|name| entry.name == *name)
                    && filter.q.as_ref().is_none_or(|q| {
                        contains_ci(&entry.name, q)
                            || contains_ci(&entry.description, q)
                    })
            })
            .map(|entry| entry.clone())
            .collect();
        results.sort_by_key(|category| (category.created_at, category.id));
        Ok(results)
    }

    async fn update(&self, category: Category) -> Result<()> {
        match self.categories.get_mut(&category.id) {
            Some(mut entry) => {
                *entry = category;
                Ok(())
            }
            None => Err(CatalogError::NotFound(format!(
                "Category {} not found",
                category.id
            ))),
        }
    }

    async fn delete(&self, id: CategoryId) -> Result<()> {
        let referenced = self
            .items
            .iter()
            .any(|entry| entry.category_id == id);
        if referenced {
            return Err(CatalogError::Conflict(format!(
                "Category {id} is referenced by existing items"
            )));
        }
        match self.categories.remove(&id) {
            Some(_) => Ok(()),
            None => {
                Err(CatalogError::NotFound(format!("Category {id} not found")))
            }
        }
    }
}

#[async_trait]
impl MediaRepository for MemoryCatalog {
    async fn create(&self, media: Media) -> Result<()> {
        self.media.insert(media.id, media);
        Ok(())
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        Ok(self.media.get(&id).map(|entry| entry.clone()))
    }

    async fn list(&self, filter: &MediaFilter) -> Result<Vec<Media>> {
        let mut results: Vec<Media> = self
            .media
            .iter()
            .filter(|entry| {
                filter
                    .media_type
                    .is_none_or(|media_type| entry.media_type == media_type)
                    && filter
                        .is_primary
                        .is_none_or(|primary| entry.is_primary == primary)
            })
            .map(|entry| entry.clone())
            .collect();
        results.sort_by_key(|media| (media.created_at, media.id));
        Ok(results)
    }

    async fn update(&self, media: Media) -> Result<()> {
        match self.media.get_mut(&media.id) {
            Some(mut entry) => {
                *entry = media;
                Ok(())
            }
            None => Err(CatalogError::NotFound(format!(
                "Media {} not found",
                media.id
            ))),
        }
    }

    async fn delete(&self, id: MediaId) -> Result<()> {
        let referenced = self
            .items
            .iter()
            .any(|entry| entry.media_ids.contains(&id));
        if referenced {
            return Err(CatalogError::Conflict(format!(
                "Media {id} is referenced by existing items"
            )));
        }
        match self.media.remove(&id) {
            Some(_) => Ok(()),
            None => Err(CatalogError::NotFound(format!("Media {id} not found"))),
        }
    }
}

#[async_trait]
impl ItemRepository for MemoryCatalog {
    async fn create(&self, item: Item) -> Result<()> {
        self.check_item_references(&item)?;
        self.items.insert(item.id, item);
        Ok(())
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.items.get(&id).map(|entry| entry.clone()))
    }

    async fn list(&self, filter: &ItemFilter, page: Page) -> Result<ItemPage> {
        let mut matches: Vec<Item> = Vec::new();
        for entry in self.items.iter() {
            if let Some(q) = &filter.q
                && !contains_ci(&entry.name, q)
                && !contains_ci(&entry.description, q)
            {
                continue;
            }
            if filter
                .condition
                .is_some_and(|condition| entry.condition != condition)
            {
                continue;
            }
            if filter.status.is_some_and(|status| entry.status != status) {
                continue;
            }
            if let Some(category_name) = &filter.category_name {
                let matched = self
                    .categories
                    .get(&entry.category_id)
                    .is_some_and(|category| category.name == *category_name);
                if !matched {
                    continue;
                }
            }
            matches.push(entry.clone());
        }
        matches.sort_by_key(|item| (item.created_at, item.id));

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect();
        Ok(ItemPage { items, total })
    }

    async fn update(&self, item: Item) -> Result<()> {
        self.check_item_references(&item)?;
        match self.items.get_mut(&item.id) {
            Some(mut entry) => {
                *entry = item;
                Ok(())
            }
            None => Err(CatalogError::NotFound(format!(
                "Item {} not found",
                item.id
            ))),
        }
    }

    async fn delete(&self, id: ItemId) -> Result<()> {
        match self.items.remove(&id) {
            Some(_) => Ok(()),
            None => Err(CatalogError::NotFound(format!("Item {id} not found"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{
        CategoryCreate, ItemCreate, ItemStatus, MediaCreate, MediaType,
    };
    use rust_decimal::Decimal;

    fn category() -> Category {
        Category::new(CategoryCreate {
            name: "Electronics".to_string(),
            description: "Devices and accessories".to_string(),
        })
    }

    fn media() -> Media {
        Media::new(MediaCreate {
            url: "https://cdn.example.com/front.jpg".to_string(),
            media_type: MediaType::Image,
            alt_text: None,
            is_primary: true,
        })
    }

    fn item(category_id: CategoryId, media_ids: Vec<MediaId>) -> Item {
        Item::new(ItemCreate {
            name: "Wireless Mouse".to_string(),
            description: "Ergonomic wireless mouse".to_string(),
            status: ItemStatus::Hidden,
            condition: catalog_model::ItemCondition::New,
            price: Decimal::new(1999, 2),
            category_id,
            media_ids,
        })
    }

    #[tokio::test]
    async fn item_create_requires_existing_category() {
        let store = MemoryCatalog::new();
        let result =
            ItemRepository::create(&store, item(CategoryId::new(), vec![]))
                .await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn item_create_requires_existing_media() {
        let store = MemoryCatalog::new();
        let cat = category();
        let cat_id = cat.id;
        CategoryRepository::create(&store, cat).await.unwrap();

        let result =
            ItemRepository::create(&store, item(cat_id, vec![MediaId::new()]))
                .await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn referenced_category_cannot_be_deleted() {
        let store = MemoryCatalog::new();
        let cat = category();
        let cat_id = cat.id;
        CategoryRepository::create(&store, cat).await.unwrap();
        ItemRepository::create(&store, item(cat_id, vec![]))
            .await
            .unwrap();

        let result = CategoryRepository::delete(&store, cat_id).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));
    }

    #[tokio::test]
    async fn referenced_media_cannot_be_deleted() {
        let store = MemoryCatalog::new();
        let cat = category();
        let cat_id = cat.id;
        CategoryRepository::create(&store, cat).await.unwrap();
        let entry = media();
        let media_id = entry.id;
        MediaRepository::create(&store, entry).await.unwrap();
        ItemRepository::create(&store, item(cat_id, vec![media_id]))
            .await
            .unwrap();

        let result = MediaRepository::delete(&store, media_id).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));

        // Dropping the item unblocks the delete.
        let page = ItemRepository::list(
            &store,
            &ItemFilter::default(),
            Page {
                page: 1,
                page_size: 10,
            },
        )
        .await
        .unwrap();
        ItemRepository::delete(&store, page.items[0].id)
            .await
            .unwrap();
        MediaRepository::delete(&store, media_id).await.unwrap();
    }

    #[tokio::test]
    async fn item_listing_paginates_and_filters() {
        let store = MemoryCatalog::new();
        let cat = category();
        let cat_id = cat.id;
        CategoryRepository::create(&store, cat).await.unwrap();
        for _ in 0..5 {
            ItemRepository::create(&store, item(cat_id, vec![]))
                .await
                .unwrap();
        }

        let filter = ItemFilter {
            status: Some(ItemStatus::Hidden),
            ..Default::default()
        };
        let page = ItemRepository::list(
            &store,
            &filter,
            Page {
                page: 2,
                page_size: 2,
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);

        let filter = ItemFilter {
            q: Some("MOUSE".to_string()),
            category_name: Some("Electronics".to_string()),
            ..Default::default()
        };
        let page = ItemRepository::list(
            &store,
            &filter,
            Page {
                page: 1,
                page_size: 10,
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 5);
    }
}
