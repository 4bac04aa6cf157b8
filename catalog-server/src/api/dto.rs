use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_model::{
    CategoryId, ItemCondition, ItemId, ItemStatus, MediaId, MediaType,
    ResourceLinks,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub links: ResourceLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaResponse {
    pub id: MediaId,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub links: ResourceLinks,
}

/// Item representation with its category and media embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub status: ItemStatus,
    pub condition: ItemCondition,
    pub price: Decimal,
    pub category: CategoryResponse,
    pub media: Vec<MediaResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub links: ResourceLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}
