use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{categories, items, jobs, media};
use crate::infra::app_state::AppState;

/// Create the full application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/categories",
            post(categories::create_category_handler)
                .get(categories::list_categories_handler),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category_handler)
                .patch(categories::update_category_handler)
                .delete(categories::delete_category_handler),
        )
        .route(
            "/media",
            post(media::create_media_handler).get(media::list_media_handler),
        )
        .route(
            "/media/{id}",
            get(media::get_media_handler)
                .patch(media::update_media_handler)
                .delete(media::delete_media_handler),
        )
        .route(
            "/items",
            post(items::create_item_handler).get(items::list_items_handler),
        )
        .route(
            "/items/{id}",
            get(items::get_item_handler)
                .patch(items::update_item_handler)
                .delete(items::delete_item_handler),
        )
        .route("/items/{id}/publish", post(items::publish_item_handler))
        .route("/jobs/{id}", get(jobs::get_job_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Catalog service: categories, media, items, publish jobs."
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
