use axum::{
    Json,
    extract::{Path, Query, State},
    http::{
        HeaderMap, StatusCode,
        header::{ETAG, IF_NONE_MATCH, LOCATION},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use catalog_core::ports::{ItemFilter, Page};
use catalog_model::{
    Item, ItemCondition, ItemCreate, ItemId, ItemStatus, ItemUpdate, Media,
};

use crate::{
    api::dto::{ItemListResponse, ItemResponse},
    api::mappers::item_response,
    errors::{AppError, AppResult},
    etag::{if_none_match, item_etag},
    infra::app_state::AppState,
};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub q: Option<String>,
    pub condition: Option<ItemCondition>,
    pub category_name: Option<String>,
    pub status: Option<ItemStatus>,
    /// Widen the default ACTIVE-only listing to every status.
    #[serde(default)]
    pub include_all: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Resolves the item's category and media into a full representation.
///
/// The gateway guarantees the references resolve at write time, so a miss
/// here is a storage-consistency fault, not a client error.
async fn hydrate(state: &AppState, item: Item) -> AppResult<ItemResponse> {
    let category = state
        .store
        .categories
        .get(item.category_id)
        .await?
        .ok_or_else(|| {
            AppError::internal(format!(
                "Item {} references missing category {}",
                item.id, item.category_id
            ))
        })?;

    let mut media = Vec::with_capacity(item.media_ids.len());
    for media_id in &item.media_ids {
        let entry: Media =
            state.store.media.get(*media_id).await?.ok_or_else(|| {
                AppError::internal(format!(
                    "Item {} references missing media {media_id}",
                    item.id
                ))
            })?;
        media.push(entry);
    }

    Ok(item_response(item, category, media))
}

pub async fn create_item_handler(
    State(state): State<AppState>,
    Json(payload): Json<ItemCreate>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let item = Item::new(payload);
    state.store.items.create(item.clone()).await?;

    let location = format!("/items/{}", item.id);
    let body = hydrate(&state, item).await?;
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(body)))
}

pub async fn list_items_handler(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    // An explicit status filter wins; otherwise hidden/sold items stay out
    // of the listing unless include_all is set.
    let status = match (query.status, query.include_all) {
        (Some(status), _) => Some(status),
        (None, true) => None,
        (None, false) => Some(ItemStatus::Active),
    };

    let filter = ItemFilter {
        q: query.q,
        condition: query.condition,
        category_name: query.category_name,
        status,
    };
    let result = state
        .store
        .items
        .list(&filter, Page { page, page_size })
        .await?;

    let mut items = Vec::with_capacity(result.items.len());
    for item in result.items {
        items.push(hydrate(&state, item).await?);
    }

    Ok(Json(ItemListResponse {
        items,
        page,
        page_size,
        total: result.total,
    }))
}

pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let id = ItemId(id);
    let item = state
        .store
        .items
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;

    let etag = item_etag(item.id, item.updated_at);
    let presented = headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok());
    if let Some(presented) = presented
        && if_none_match(presented, &etag)
    {
        return Ok(
            (StatusCode::NOT_MODIFIED, [(ETAG, etag)]).into_response()
        );
    }

    let body = hydrate(&state, item).await?;
    Ok((StatusCode::OK, [(ETAG, etag)], Json(body)).into_response())
}

pub async fn update_item_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ItemUpdate>,
) -> AppResult<impl IntoResponse> {
    update.validate()?;
    let id = ItemId(id);
    let mut item = state
        .store
        .items
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;

    item.apply(update);
    state.store.items.update(item.clone()).await?;

    let body = hydrate(&state, item).await?;
    Ok(Json(body))
}

pub async fn delete_item_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state.store.items.delete(ItemId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Accepts a publish request: allocates a PENDING job, schedules the
/// worker, and returns 202 with the job's poll location. The response is
/// never blocked on worker execution.
pub async fn publish_item_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let id = ItemId(id);
    let item = state
        .store
        .items
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;

    let job = state.publisher.schedule(item.id)?;
    let location = format!("/jobs/{}", job.id);
    Ok((StatusCode::ACCEPTED, [(LOCATION, location)], Json(job)))
}
