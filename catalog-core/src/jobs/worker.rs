use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{error, info, warn};

use catalog_model::{ItemId, ItemStatus, JobId, JobStatus, PublishJob};

use crate::database::ports::ItemRepository;
use crate::error::{CatalogError, Result};
use crate::jobs::registry::JobRegistry;

/// Tuning for the publish workflow.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    /// Stand-in for the real publishing side effect (search-index writes,
    /// notification fan-out).
    pub work_delay: Duration,
    /// Deadline for one job's unit of work. On expiry the job fails rather
    /// than staying IN_PROGRESS forever.
    pub job_timeout: Duration,
    /// Maximum concurrently running publish jobs; requests past this are
    /// rejected before a job is allocated.
    pub max_in_flight: usize,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            work_delay: Duration::from_secs(2),
            job_timeout: Duration::from_secs(30),
            max_in_flight: 32,
        }
    }
}

/// Schedules and runs publish jobs.
///
/// `schedule` returns as soon as the job record is in the registry; the
/// worker runs on its own task and reports progress only through the
/// registry. Concurrency is bounded by a semaphore whose permits travel
/// with the spawned tasks.
#[derive(Clone)]
pub struct PublishScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    items: Arc<dyn ItemRepository>,
    registry: Arc<JobRegistry>,
    limiter: Arc<Semaphore>,
    settings: PublishSettings,
}

impl fmt::Debug for PublishScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishScheduler")
            .field("available_permits", &self.inner.limiter.available_permits())
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl PublishScheduler {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        registry: Arc<JobRegistry>,
        settings: PublishSettings,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                items,
                registry,
                limiter: Arc::new(Semaphore::new(settings.max_in_flight)),
                settings,
            }),
        }
    }

    /// Allocates a PENDING job for `item_id` and schedules the worker.
    ///
    /// The caller has already verified the item exists. Returns
    /// `Overloaded` without allocating a job when `max_in_flight` workers
    /// are already running. Never blocks on worker execution.
    pub fn schedule(&self, item_id: ItemId) -> Result<PublishJob> {
        let permit = match Arc::clone(&self.inner.limiter).try_acquire_owned()
        {
            Ok(permit) => permit,
            Err(_) => {
                warn!(%item_id, "publish rejected: worker limit reached");
                return Err(CatalogError::Overloaded(format!(
                    "{} publish jobs already in flight",
                    self.inner.settings.max_in_flight
                )));
            }
        };

        let job = PublishJob::accepted(item_id);
        self.inner.registry.insert(job.clone());
        info!(job_id = %job.id, %item_id, "publish job accepted");

        let inner = Arc::clone(&self.inner);
        let job_id = job.id;
        tokio::spawn(async move {
            let _permit = permit;
            run_publish_job(inner, job_id).await;
        });

        Ok(job)
    }

    #[cfg(test)]
    fn registry(&self) -> &JobRegistry {
        &self.inner.registry
    }
}

/// Drives one job from PENDING to a terminal state.
async fn run_publish_job(inner: Arc<SchedulerInner>, job_id: JobId) {
    let Some(job) = inner.registry.get(job_id) else {
        // Should be unreachable while jobs are never deleted; a cleared
        // registry would land here.
        warn!(%job_id, "publish job missing from registry; dropping work");
        return;
    };
    let item_id = job.item_id;

    if let Err(err) =
        inner
            .registry
            .transition(job_id, JobStatus::InProgress, "Publishing item")
    {
        warn!(%job_id, %err, "could not start publish job");
        return;
    }
    info!(%job_id, %item_id, "publish job started");

    let outcome =
        timeout(inner.settings.job_timeout, publish_item(&inner, item_id))
            .await;

    let (status, message) = match outcome {
        Ok(Ok(())) => {
            (JobStatus::Completed, format!("Item {item_id} published"))
        }
        Ok(Err(CatalogError::NotFound(_))) => (
            JobStatus::Failed,
            format!("Item {item_id} no longer exists"),
        ),
        Ok(Err(err)) => {
            error!(%job_id, %item_id, %err, "publish job failed");
            (JobStatus::Failed, format!("Publish failed: {err}"))
        }
        Err(_) => (
            JobStatus::Failed,
            format!(
                "Publish timed out after {}s",
                inner.settings.job_timeout.as_secs()
            ),
        ),
    };

    match inner.registry.transition(job_id, status, message) {
        Ok(job) => {
            info!(%job_id, %item_id, status = %job.status, "publish job finished")
        }
        Err(err) => error!(%job_id, %err, "could not finalize publish job"),
    }
}

/// The unit of work: simulated side effect, then the durable status write.
async fn publish_item(
    inner: &SchedulerInner,
    item_id: ItemId,
) -> Result<()> {
    tokio::time::sleep(inner.settings.work_delay).await;

    let Some(mut item) = inner.items.get(item_id).await? else {
        return Err(CatalogError::NotFound(format!(
            "Item {item_id} not found"
        )));
    };

    item.status = ItemStatus::Active;
    item.updated_at = Utc::now();
    inner.items.update(item).await
}
