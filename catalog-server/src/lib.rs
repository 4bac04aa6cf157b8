//! # Catalog Server
//!
//! Catalog microservice exposing CRUD endpoints for categories, media, and
//! items, plus an asynchronous item publish workflow with pollable jobs.
//!
//! The server is built on Axum and uses:
//! - PostgreSQL for persistent entity storage (in-memory mode for tests)
//! - An in-process job registry polled via `GET /jobs/{id}`
//! - Bounded fire-and-forget publish workers on the Tokio runtime

pub mod api;
pub mod errors;
pub mod etag;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::config::Config;
pub use routes::create_router;
