use std::{fmt, sync::Arc};

use catalog_core::{CatalogStore, JobRegistry, PublishScheduler};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: CatalogStore,
    pub jobs: Arc<JobRegistry>,
    pub publisher: PublishScheduler,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the job registry and publish scheduler around the given store.
    pub fn new(store: CatalogStore, config: Config) -> Self {
        let jobs = Arc::new(JobRegistry::new());
        let publisher = PublishScheduler::new(
            store.items.clone(),
            jobs.clone(),
            config.publish.clone(),
        );
        Self {
            store,
            jobs,
            publisher,
            config: Arc::new(config),
        }
    }
}
