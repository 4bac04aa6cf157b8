use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::CategoryId;

pub const NAME_MAX: usize = 255;
pub const DESCRIPTION_MAX: usize = 2000;

/// A catalog category. Items belong to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(payload: CategoryCreate) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: payload.name,
            description: payload.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update, refreshing `updated_at`.
    pub fn apply(&mut self, update: CategoryUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: String,
}

impl CategoryCreate {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_description(&self.description)
    }
}

/// Partial update for a category; only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
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
