pub mod memory;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::job::{Job, JobStatus};
use crate::models::window::BlockedWindow;
use crate::models::worker::{Worker, WorkerStatus};

/// Trailing completion counts for one worker. Cancelled jobs are excluded
/// from the assigned denominator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionStats {
    pub completed: u32,
    pub assigned: u32,
}

impl CompletionStats {
    pub fn completion_rate(&self) -> Option<f64> {
        if self.assigned == 0 {
            None
        } else {
            Some(self.completed as f64 / self.assigned as f64)
        }
    }
}

/// Storage seam between the scheduling engine and whatever holds the
/// records, so the engine can be exercised against in-memory fixtures.
/// Implementations must return list results in a deterministic order;
/// ranking ties break on that order.
pub trait SchedulingStore: Send + Sync {
    fn job(&self, id: Uuid) -> Option<Job>;
    fn insert_job(&self, job: Job);
    fn update_job_status(&self, id: Uuid, status: JobStatus) -> Option<Job>;
    fn assign_worker(&self, job_id: Uuid, worker_id: Uuid) -> Option<Job>;
    /// Jobs for the provider on the given calendar day, cancelled excluded.
    fn active_jobs_on_date(&self, provider_id: Uuid, date: NaiveDate) -> Vec<Job>;
    /// Jobs still occupying a schedule that share a worker with `job` and
    /// overlap its interval.
    fn overlapping_assigned_jobs(&self, job: &Job) -> Vec<Job>;

    fn worker(&self, id: Uuid) -> Option<Worker>;
    fn insert_worker(&self, worker: Worker);
    fn update_worker_status(&self, id: Uuid, status: WorkerStatus) -> Option<Worker>;
    fn active_workers(&self, provider_id: Uuid) -> Vec<Worker>;
    fn list_workers(&self) -> Vec<Worker>;

    fn insert_window(&self, window: BlockedWindow);
    fn list_windows(&self) -> Vec<BlockedWindow>;
    /// Windows whose [from_date, to_date] range covers the given day.
    fn windows_covering(&self, provider_id: Uuid, date: NaiveDate) -> Vec<BlockedWindow>;

    fn completion_stats(&self, worker_id: Uuid, since: DateTime<Utc>) -> CompletionStats;
}
