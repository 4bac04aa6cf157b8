//! Entity-to-representation mapping, including hypermedia link population.

use catalog_model::{Category, Item, Media, ResourceLinks};

use crate::api::dto::{CategoryResponse, ItemResponse, MediaResponse};

pub fn category_response(category: Category) -> CategoryResponse {
    let links = ResourceLinks::new(format!("/categories/{}", category.id));
    CategoryResponse {
        id: category.id,
        name: category.name,
        description: category.description,
        created_at: category.created_at,
        updated_at: category.updated_at,
        links,
    }
}

pub fn media_response(media: Media) -> MediaResponse {
    let links = ResourceLinks::new(format!("/media/{}", media.id));
    MediaResponse {
        id: media.id,
        url: media.url,
        media_type: media.media_type,
        alt_text: media.alt_text,
        is_primary: media.is_primary,
        created_at: media.created_at,
        updated_at: media.updated_at,
        links,
    }
}

pub fn item_response(
    item: Item,
    category: Category,
    media: Vec<Media>,
) -> ItemResponse {
    let links = ResourceLinks::new(format!("/items/{}", item.id));
    ItemResponse {
        id: item.id,
        name: item.name,
        description: item.description,
        status: item.status,
        condition: item.condition,
        price: item.price,
        category: category_response(category),
        media: media.into_iter().map(media_response).collect(),
        created_at: item.created_at,
        updated_at: item.updated_at,
        links,
    }
}
