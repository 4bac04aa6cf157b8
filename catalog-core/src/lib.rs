//! Core library for the catalog service.
//!
//! Holds the persistence gateway (repository ports plus Postgres and
//! in-memory implementations), the process-wide publish job registry, and
//! the asynchronous publish worker.

pub mod database;
pub mod error;
pub mod jobs;

pub use database::{CatalogStore, ports};
pub use error::{CatalogError, Result};
pub use jobs::{JobRegistry, PublishScheduler, PublishSettings};
