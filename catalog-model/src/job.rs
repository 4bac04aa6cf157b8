use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, JobId};

/// Lifecycle state of a publish job.
///
/// Transitions are monotonic: `Pending` → `InProgress` →
/// (`Completed` | `Failed`). `Completed` and `Failed` are terminal; a job in
/// either state never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Pending, JobStatus::InProgress) => true,
            // A job that never started may still fail (scheduling faults).
            (JobStatus::Pending, JobStatus::Failed) => true,
            (JobStatus::InProgress, JobStatus::Completed) => true,
            (JobStatus::InProgress, JobStatus::Failed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked record of one asynchronous publish operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishJob {
    pub id: JobId,
    pub item_id: ItemId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result_message: Option<String>,
}

impl PublishJob {
    /// A freshly accepted job in `Pending` state.
    pub fn accepted(item_id: ItemId) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            item_id,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            result_message: Some("Publish job accepted".to_string()),
        }
    }
}
