use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use catalog_core::ports::MediaFilter;
use catalog_model::{Media, MediaCreate, MediaId, MediaType, MediaUpdate};

use crate::{
    api::mappers::media_response,
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MediaListQuery {
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub is_primary: Option<bool>,
}

pub async fn create_media_handler(
    State(state): State<AppState>,
    Json(payload): Json<MediaCreate>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let media = Media::new(payload);
    state.store.media.create(media.clone()).await?;

    let location = format!("/media/{}", media.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(media_response(media)),
    ))
}

pub async fn list_media_handler(
    State(state): State<AppState>,
    Query(query): Query<MediaListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = MediaFilter {
        media_type: query.media_type,
        is_primary: query.is_primary,
    };
    let media = state.store.media.list(&filter).await?;
    Ok(Json(
        media.into_iter().map(media_response).collect::<Vec<_>>(),
    ))
}

pub async fn get_media_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let id = MediaId(id);
    let media = state
        .store
        .media
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Media {id} not found")))?;
    Ok(Json(media_response(media)))
}

pub async fn update_media_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<MediaUpdate>,
) -> AppResult<impl IntoResponse> {
    update.validate()?;
    let id = MediaId(id);
    let mut media = state
        .store
        .media
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Media {id} not found")))?;

    media.apply(update);
    state.store.media.update(media.clone()).await?;
    Ok(Json(media_response(media)))
}

pub async fn delete_media_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state.store.media.delete(MediaId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
