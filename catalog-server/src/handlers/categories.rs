use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use catalog_core::ports::CategoryFilter;
use catalog_model::{Category, CategoryCreate, CategoryId, CategoryUpdate};

use crate::{
    api::mappers::category_response,
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    pub name: Option<String>,
    pub q: Option<String>,
}

pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let category = Category::new(payload);
    state.store.categories.create(category.clone()).await?;

    let location = format!("/categories/{}", category.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(category_response(category)),
    ))
}

pub async fn list_categories_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = CategoryFilter {
        name: query.name,
        q: query.q,
    };
    let categories = state.store.categories.list(&filter).await?;
    Ok(Json(
        categories
            .into_iter()
            .map(category_response)
            .collect::<Vec<_>>(),
    ))
}

pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let id = CategoryId(id);
    let category = state.store.categories.get(id).await?.ok_or_else(|| {
        AppError::not_found(format!("Category {id} not found"))
    })?;
    Ok(Json(category_response(category)))
}

pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<CategoryUpdate>,
) -> AppResult<impl IntoResponse> {
    update.validate()?;
    let id = CategoryId(id);
    let mut category =
        state.store.categories.get(id).await?.ok_or_else(|| {
            AppError::not_found(format!("Category {id} not found"))
        })?;

    category.apply(update);
    state.store.categories.update(category.clone()).await?;
    Ok(Json(category_response(category)))
}

pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state.store.categories.delete(CategoryId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
