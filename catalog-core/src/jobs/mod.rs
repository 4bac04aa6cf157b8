//! Publish job tracking and execution.
//!
//! [`JobRegistry`] is the process-wide source of truth for poll responses;
//! [`PublishScheduler`] owns the fire-and-forget worker that drives each job
//! through its lifecycle.

pub mod registry;
pub mod worker;

pub use registry::JobRegistry;
pub use worker::{PublishScheduler, PublishSettings};
