mod categories;
mod items;
mod media;

pub use categories::PostgresCategoryRepository;
pub use items::PostgresItemRepository;
pub use media::PostgresMediaRepository;
