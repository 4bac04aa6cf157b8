//! Core data model definitions shared across catalog crates.

pub mod category;
pub mod error;
pub mod ids;
pub mod item;
pub mod job;
pub mod links;
pub mod media;

// Intentionally curated re-exports for downstream consumers.
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CategoryId, ItemId, JobId, MediaId};
pub use item::{Item, ItemCondition, ItemCreate, ItemStatus, ItemUpdate};
pub use job::{JobStatus, PublishJob};
pub use links::ResourceLinks;
pub use media::{Media, MediaCreate, MediaType, MediaUpdate};
