//! Shared helpers for integration tests: an in-memory server plus seeding
//! and polling utilities.

// Each test binary pulls in the helpers it needs.
#![allow(dead_code)]

use std::time::Duration;

use axum_test::TestServer;
use serde_json::{Value, json};
use uuid::Uuid;

use catalog_core::{CatalogStore, PublishSettings};
use catalog_server::{AppState, Config, create_router};

pub fn fast_publish() -> PublishSettings {
    PublishSettings {
        work_delay: Duration::from_millis(25),
        job_timeout: Duration::from_secs(5),
        max_in_flight: 8,
    }
}

pub fn server_with(publish: PublishSettings) -> (TestServer, AppState) {
    let mut config = Config::default();
    config.publish = publish;
    let state = AppState::new(CatalogStore::memory(), config);
    let server = create_router(state.clone());
    (TestServer::new(server).unwrap(), state)
}

pub fn server() -> (TestServer, AppState) {
    server_with(fast_publish())
}

pub async fn create_category(server: &TestServer, name: &str) -> Uuid {
    let response = server
        .post("/categories")
        .json(&json!({
            "name": name,
            "description": "Devices, gadgets, and electronic accessories.",
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

pub async fn create_media(server: &TestServer, media_type: &str) -> Uuid {
    let response = server
        .post("/media")
        .json(&json!({
            "url": "https://cdn.example.com/items/mouse/front.jpg",
            "type": media_type,
            "alt_text": "Front view of the wireless mouse",
            "is_primary": true,
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

pub async fn create_item(
    server: &TestServer,
    category_id: Uuid,
    status: &str,
) -> Uuid {
    create_item_named(server, category_id, status, "Wireless Mouse").await
}

pub async fn create_item_named(
    server: &TestServer,
    category_id: Uuid,
    status: &str,
    name: &str,
) -> Uuid {
    let response = server
        .post("/items")
        .json(&json!({
            "name": name,
            "description": "Ergonomic wireless mouse with USB receiver.",
            "status": status,
            "condition": "new",
            "price": "19.99",
            "category_id": category_id,
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Polls the job until it leaves PENDING/IN_PROGRESS.
pub async fn wait_job_terminal(server: &TestServer, job_id: &str) -> Value {
    for _ in 0..400 {
        let response = server.get(&format!("/jobs/{job_id}")).await;
        assert_eq!(response.status_code(), 200);
        let job: Value = response.json();
        match job["status"].as_str().unwrap() {
            "completed" | "failed" => return job,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {job_id} never reached a terminal state");
}
