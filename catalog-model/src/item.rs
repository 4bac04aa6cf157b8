use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::{CategoryId, ItemId, MediaId};

pub const NAME_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 2000;
pub const MEDIA_MAX: usize = 10;

/// Visibility of an item in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Hidden,
    Sold,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Hidden => "hidden",
            ItemStatus::Sold => "sold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ItemStatus::Active),
            "hidden" => Some(ItemStatus::Hidden),
            "sold" => Some(ItemStatus::Sold),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical condition of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    New,
    Used,
    Refurbished,
}

impl ItemCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCondition::New => "new",
            ItemCondition::Used => "used",
            ItemCondition::Refurbished => "refurbished",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(ItemCondition::New),
            "used" => Some(ItemCondition::Used),
            "refurbished" => Some(ItemCondition::Refurbished),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog item. References one category and up to [`MEDIA_MAX`] media
/// entries; both references must resolve at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub status: ItemStatus,
    pub condition: ItemCondition,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub media_ids: Vec<MediaId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(payload: ItemCreate) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            name: payload.name,
            description: payload.description,
            status: payload.status,
            condition: payload.condition,
            price: payload.price,
            category_id: payload.category_id,
            media_ids: payload.media_ids,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update, refreshing `updated_at`.
    pub fn apply(&mut self, update: ItemUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(condition) = update.condition {
            self.condition = condition;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(media_ids) = update.media_ids {
            self.media_ids = media_ids;
        }
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: ItemStatus,
    #[serde(default = "default_condition")]
    pub condition: ItemCondition,
    pub price: Decimal,
    pub category_id: CategoryId,
    #[serde(default)]
    pub media_ids: Vec<MediaId>,
}

fn default_status() -> ItemStatus {
    ItemStatus::Active
}

fn default_condition() -> ItemCondition {
    ItemCondition::New
}

impl ItemCreate {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_price(&self.price)?;
        validate_media_count(self.media_ids.len())
    }
}

/// Partial update for an item; only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub condition: Option<ItemCondition>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub media_ids: Option<Vec<MediaId>>,
}

impl ItemUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = &self.price {
            validate_price(price)?;
        }
        if let Some(media_ids) = &self.media_ids {
            validate_media_count(media_ids.len())?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().count() > NAME_MAX {
        return Err(ModelError::LengthOutOfRange {
            field: "name",
            min: 1,
            max: NAME_MAX,
        });
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.is_empty() || description.chars().count() > DESCRIPTION_MAX {
        return Err(ModelError::LengthOutOfRange {
            field: "description",
            min: 1,
            max: DESCRIPTION_MAX,
        });
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<()> {
    let min = Decimal::ZERO;
    let max = Decimal::new(99_999_999, 2); // 999999.99
    if *price <= min || *price > max {
        return Err(ModelError::PriceOutOfRange);
    }
    if price.scale() > 2 && price.normalize().scale() > 2 {
        return Err(ModelError::PricePrecision);
    }
    Ok(())
}

fn validate_media_count(count: usize) -> Result<()> {
    if count > MEDIA_MAX {
        return Err(ModelError::TooManyMedia { max: MEDIA_MAX });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_payload(price: &str) -> ItemCreate {
        ItemCreate {
            name: "Wireless Mouse".to_string(),
            description: "Ergonomic wireless mouse.".to_string(),
            status: ItemStatus::Active,
            condition: ItemCondition::New,
            price: Decimal::from_str(price).unwrap(),
            category_id: CategoryId::new(),
            media_ids: Vec::new(),
        }
    }

    #[test]
    fn accepts_price_within_range() {
        assert!(create_payload("19.99").validate().is_ok());
        assert!(create_payload("0.01").validate().is_ok());
        assert!(create_payload("999999.99").validate().is_ok());
    }

    #[test]
    fn rejects_price_out_of_range() {
        assert_eq!(
            create_payload("0.00").validate(),
            Err(ModelError::PriceOutOfRange)
        );
        assert_eq!(
            create_payload("1000000.00").validate(),
            Err(ModelError::PriceOutOfRange)
        );
    }

    #[test]
    fn rejects_price_with_excess_precision() {
        assert_eq!(
            create_payload("19.999").validate(),
            Err(ModelError::PricePrecision)
        );
    }

    #[test]
    fn rejects_oversized_media_list() {
        let mut payload = create_payload("19.99");
        payload.media_ids = (0..=MEDIA_MAX).map(|_| MediaId::new()).collect();
        assert_eq!(
            payload.validate(),
            Err(ModelError::TooManyMedia { max: MEDIA_MAX })
        );
    }

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in [ItemStatus::Active, ItemStatus::Hidden, ItemStatus::Sold] {
            assert_eq!(ItemStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ItemStatus::parse("archived"), None);
    }
}
