use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ModelError, Result};
use crate::ids::MediaId;

/// Kind of media asset attached to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media entry (image or video). Media and items are many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Media {
    pub fn new(payload: MediaCreate) -> Self {
        let now = Utc::now();
        Self {
            id: MediaId::new(),
            url: payload.url,
            media_type: payload.media_type,
            alt_text: payload.alt_text,
            is_primary: payload.is_primary,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: MediaUpdate) {
        if let Some(url) = update.url {
            self.url = url;
        }
        if let Some(media_type) = update.media_type {
            self.media_type = media_type;
        }
        if let Some(alt_text) = update.alt_text {
            self.alt_text = Some(alt_text);
        }
        if let Some(is_primary) = update.is_primary {
            self.is_primary = is_primary;
        }
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a new media entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaCreate {
    pub url: String,
    #[serde(rename = "type", default = "default_media_type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

fn default_media_type() -> MediaType {
    MediaType::Image
}

impl MediaCreate {
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.url)
    }
}

/// Partial update for a media entry; only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaUpdate {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: Option<bool>,
}

impl MediaUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        Ok(())
    }
}

fn validate_url(value: &str) -> Result<()> {
    Url::parse(value).map_err(|_| ModelError::InvalidValue {
        field: "url",
        value: value.to_string(),
    })?;
    Ok(())
}
