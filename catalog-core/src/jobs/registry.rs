use chrono::Utc;
use dashmap::DashMap;

use catalog_model::{JobId, JobStatus, PublishJob};

use crate::error::{CatalogError, Result};

/// Process-wide mapping from job identifier to job state.
///
/// Jobs are never removed; they accumulate for the life of the process.
/// Every read-modify-write of a single entry happens under that entry's
/// shard lock, so a concurrent poller either sees the state before a
/// transition or the state after it, never a half-written record.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<JobId, PublishJob>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, job: PublishJob) {
        self.jobs.insert(job.id, job);
    }

    pub fn get(&self, id: JobId) -> Option<PublishJob> {
        self.jobs.get(&id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Applies one state transition, enforcing the job state machine.
    ///
    /// Fails `NotFound` for unknown ids and `Conflict` for transitions the
    /// state machine forbids (anything out of a terminal state, or skipping
    /// ahead). The new state is visible to readers before this returns.
    pub fn transition(
        &self,
        id: JobId,
        next: JobStatus,
        message: impl Into<String>,
    ) -> Result<PublishJob> {
        let mut entry = self.jobs.get_mut(&id).ok_or_else(|| {
            CatalogError::NotFound(format!("Job {id} not found"))
        })?;

        if !entry.status.can_transition_to(next) {
            return Err(CatalogError::Conflict(format!(
                "Job {id} cannot move from {} to {next}",
                entry.status
            )));
        }

        entry.status = next;
        entry.result_message = Some(message.into());
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::ItemId;

    fn pending_job(registry: &JobRegistry) -> JobId {
        let job = PublishJob::accepted(ItemId::new());
        let id = job.id;
        registry.insert(job);
        id
    }

    #[test]
    fn transition_follows_the_state_machine() {
        let registry = JobRegistry::new();
        let id = pending_job(&registry);

        let job = registry
            .transition(id, JobStatus::InProgress, "Publishing item")
            .unwrap();
        assert_eq!(job.status, JobStatus::InProgress);

        let job = registry
            .transition(id, JobStatus::Completed, "Item published")
            .unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[test]
    fn terminal_jobs_are_immutable() {
        let registry = JobRegistry::new();
        let id = pending_job(&registry);
        registry
            .transition(id, JobStatus::InProgress, "Publishing item")
            .unwrap();
        registry
            .transition(id, JobStatus::Failed, "Item vanished")
            .unwrap();

        for next in [
            JobStatus::Pending,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            let result = registry.transition(id, next, "late write");
            assert!(matches!(result, Err(CatalogError::Conflict(_))));
        }

        let job = registry.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.result_message.as_deref(), Some("Item vanished"));
    }

    #[test]
    fn pending_cannot_skip_to_completed() {
        let registry = JobRegistry::new();
        let id = pending_job(&registry);
        let result = registry.transition(id, JobStatus::Completed, "skip");
        assert!(matches!(result, Err(CatalogError::Conflict(_))));
    }

    #[test]
    fn unknown_job_is_not_found() {
        let registry = JobRegistry::new();
        let result =
            registry.transition(JobId::new(), JobStatus::InProgress, "x");
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
        assert!(registry.get(JobId::new()).is_none());
    }

    #[test]
    fn transitions_update_the_timestamp() {
        let registry = JobRegistry::new();
        let id = pending_job(&registry);
        let before = registry.get(id).unwrap();
        let after = registry
            .transition(id, JobStatus::InProgress, "Publishing item")
            .unwrap();
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }
}
