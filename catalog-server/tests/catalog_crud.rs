//! CRUD coverage for categories, media, and items: validation, referential
//! integrity, filtering, pagination, and conditional GETs.

mod support;

use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn category_crud_roundtrip() {
    let (server, _state) = support::server();

    let create = server
        .post("/categories")
        .json(&json!({
            "name": "Electronics",
            "description": "Devices and accessories.",
        }))
        .await;
    assert_eq!(create.status_code(), 201);
    let created: Value = create.json();
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(
        create.header("location").to_str().unwrap(),
        format!("/categories/{id}")
    );
    assert_eq!(created["links"]["self"], format!("/categories/{id}"));

    let fetched: Value = server.get(&format!("/categories/{id}")).await.json();
    assert_eq!(fetched["name"], "Electronics");

    let patch = server
        .patch(&format!("/categories/{id}"))
        .json(&json!({ "name": "Consumer Electronics" }))
        .await;
    assert_eq!(patch.status_code(), 200);
    let patched: Value = patch.json();
    assert_eq!(patched["name"], "Consumer Electronics");
    assert_eq!(patched["description"], "Devices and accessories.");
    assert!(patched["updated_at"] != created["updated_at"]);

    let listed: Value = server.get("/categories?q=consumer").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let empty: Value = server.get("/categories?q=garden").await.json();
    assert!(empty.as_array().unwrap().is_empty());

    let delete = server.delete(&format!("/categories/{id}")).await;
    assert_eq!(delete.status_code(), 204);
    let gone = server.get(&format!("/categories/{id}")).await;
    assert_eq!(gone.status_code(), 404);
}

#[tokio::test]
async fn category_validation_rejects_bad_payloads() {
    let (server, _state) = support::server();

    let blank = server
        .post("/categories")
        .json(&json!({ "name": "", "description": "d" }))
        .await;
    assert_eq!(blank.status_code(), 422);

    let long = server
        .post("/categories")
        .json(&json!({ "name": "x".repeat(256), "description": "d" }))
        .await;
    assert_eq!(long.status_code(), 422);
}

#[tokio::test]
async fn referenced_category_cannot_be_deleted() {
    let (server, _state) = support::server();
    let category_id = support::create_category(&server, "Electronics").await;
    let item_id = support::create_item(&server, category_id, "active").await;

    let blocked = server.delete(&format!("/categories/{category_id}")).await;
    assert_eq!(blocked.status_code(), 400);

    // Once the item is gone the category can be deleted.
    server.delete(&format!("/items/{item_id}")).await;
    let delete = server.delete(&format!("/categories/{category_id}")).await;
    assert_eq!(delete.status_code(), 204);
}

#[tokio::test]
async fn media_crud_and_type_filtering() {
    let (server, _state) = support::server();
    let image_id = support::create_media(&server, "image").await;
    let _video_id = support::create_media(&server, "video").await;

    let videos: Value = server.get("/media?type=video").await.json();
    assert_eq!(videos.as_array().unwrap().len(), 1);
    assert_eq!(videos[0]["type"], "video");

    let patch = server
        .patch(&format!("/media/{image_id}"))
        .json(&json!({ "is_primary": false }))
        .await;
    assert_eq!(patch.status_code(), 200);
    let patched: Value = patch.json();
    assert_eq!(patched["is_primary"], false);

    let invalid_url = server
        .post("/media")
        .json(&json!({ "url": "not a url", "type": "image" }))
        .await;
    assert_eq!(invalid_url.status_code(), 422);
}

#[tokio::test]
async fn referenced_media_cannot_be_deleted() {
    let (server, _state) = support::server();
    let category_id = support::create_category(&server, "Electronics").await;
    let media_id = support::create_media(&server, "image").await;

    let create = server
        .post("/items")
        .json(&json!({
            "name": "Wireless Mouse",
            "description": "Ergonomic wireless mouse.",
            "price": "19.99",
            "category_id": category_id,
            "media_ids": [media_id],
        }))
        .await;
    assert_eq!(create.status_code(), 201);
    let item: Value = create.json();
    assert_eq!(item["media"][0]["id"], media_id.to_string());

    let blocked = server.delete(&format!("/media/{media_id}")).await;
    assert_eq!(blocked.status_code(), 400);
}

#[tokio::test]
async fn item_creation_enforces_references_and_validation() {
    let (server, _state) = support::server();
    let category_id = support::create_category(&server, "Electronics").await;

    let unknown_category = server
        .post("/items")
        .json(&json!({
            "name": "Wireless Mouse",
            "description": "d",
            "price": "19.99",
            "category_id": Uuid::new_v4(),
        }))
        .await;
    assert_eq!(unknown_category.status_code(), 404);

    let unknown_media = server
        .post("/items")
        .json(&json!({
            "name": "Wireless Mouse",
            "description": "d",
            "price": "19.99",
            "category_id": category_id,
            "media_ids": [Uuid::new_v4()],
        }))
        .await;
    assert_eq!(unknown_media.status_code(), 404);

    for price in ["0", "-1.00", "1000000.00", "19.999"] {
        let bad_price = server
            .post("/items")
            .json(&json!({
                "name": "Wireless Mouse",
                "description": "d",
                "price": price,
                "category_id": category_id,
            }))
            .await;
        assert_eq!(bad_price.status_code(), 422, "price {price}");
    }
}

#[tokio::test]
async fn item_listing_defaults_filters_and_paginates() {
    let (server, _state) = support::server();
    let category_id = support::create_category(&server, "Electronics").await;
    let other_category = support::create_category(&server, "Books").await;

    for name in ["Keyboard", "Monitor", "Webcam"] {
        support::create_item_named(&server, category_id, "active", name).await;
    }
    support::create_item_named(&server, other_category, "hidden", "Atlas")
        .await;

    // Hidden items stay out of the default listing.
    let default: Value = server.get("/items").await.json();
    assert_eq!(default["total"], 3);
    assert_eq!(default["page"], 1);
    assert_eq!(default["page_size"], 20);

    let all: Value = server.get("/items?include_all=true").await.json();
    assert_eq!(all["total"], 4);

    let hidden: Value = server.get("/items?status=hidden").await.json();
    assert_eq!(hidden["total"], 1);
    assert_eq!(hidden["items"][0]["name"], "Atlas");

    let by_category: Value =
        server.get("/items?category_name=Electronics").await.json();
    assert_eq!(by_category["total"], 3);

    let by_text: Value = server.get("/items?q=monitor").await.json();
    assert_eq!(by_text["total"], 1);

    let page: Value = server.get("/items?page=2&page_size=2").await.json();
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["page"], 2);
    assert_eq!(page["page_size"], 2);
}

#[tokio::test]
async fn item_response_embeds_category_and_links() {
    let (server, _state) = support::server();
    let category_id = support::create_category(&server, "Electronics").await;
    let item_id = support::create_item(&server, category_id, "active").await;

    let item: Value = server.get(&format!("/items/{item_id}")).await.json();
    assert_eq!(item["category"]["id"], category_id.to_string());
    assert_eq!(item["category"]["name"], "Electronics");
    assert_eq!(item["price"], "19.99");
    assert_eq!(item["condition"], "new");
    assert_eq!(item["links"]["self"], format!("/items/{item_id}"));
}

#[tokio::test]
async fn conditional_get_honors_etags() {
    let (server, _state) = support::server();
    let category_id = support::create_category(&server, "Electronics").await;
    let item_id = support::create_item(&server, category_id, "active").await;

    let first = server.get(&format!("/items/{item_id}")).await;
    assert_eq!(first.status_code(), 200);
    let etag = first.header("etag").to_str().unwrap().to_owned();
    assert!(etag.starts_with('"') && etag.ends_with('"'));

    let cached = server
        .get(&format!("/items/{item_id}"))
        .add_header("if-none-match", etag.as_str())
        .await;
    assert_eq!(cached.status_code(), 304);

    let wildcard = server
        .get(&format!("/items/{item_id}"))
        .add_header("if-none-match", "*")
        .await;
    assert_eq!(wildcard.status_code(), 304);

    let patch = server
        .patch(&format!("/items/{item_id}"))
        .json(&json!({ "price": "24.99" }))
        .await;
    assert_eq!(patch.status_code(), 200);

    // The stale validator no longer matches.
    let refreshed = server
        .get(&format!("/items/{item_id}"))
        .add_header("if-none-match", etag.as_str())
        .await;
    assert_eq!(refreshed.status_code(), 200);
    let new_etag = refreshed.header("etag").to_str().unwrap().to_owned();
    assert_ne!(new_etag, etag);
}

#[tokio::test]
async fn item_update_rewires_references() {
    let (server, _state) = support::server();
    let category_id = support::create_category(&server, "Electronics").await;
    let other_category = support::create_category(&server, "Books").await;
    let media_id = support::create_media(&server, "image").await;
    let item_id = support::create_item(&server, category_id, "active").await;

    let patch = server
        .patch(&format!("/items/{item_id}"))
        .json(&json!({
            "category_id": other_category,
            "media_ids": [media_id],
            "status": "sold",
        }))
        .await;
    assert_eq!(patch.status_code(), 200);
    let patched: Value = patch.json();
    assert_eq!(patched["category"]["id"], other_category.to_string());
    assert_eq!(patched["media"][0]["id"], media_id.to_string());
    assert_eq!(patched["status"], "sold");

    let dangling = server
        .patch(&format!("/items/{item_id}"))
        .json(&json!({ "category_id": Uuid::new_v4() }))
        .await;
    assert_eq!(dangling.status_code(), 404);
}
