pub mod categories;
pub mod items;
pub mod jobs;
pub mod media;
