use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::address::Address;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl JobStatus {
    /// Statuses that still occupy a worker's schedule.
    pub fn occupies_schedule(self) -> bool {
        !matches!(
            self,
            JobStatus::Cancelled | JobStatus::Completed | JobStatus::NoShow
        )
    }
}

/// A scheduled service visit. The time range is half-open: `[start, end)`,
/// so a job ending exactly when another starts does not overlap it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub service_type: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub address: Address,
    pub estimated_value: f64,
    pub assigned_worker_ids: Vec<Uuid>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Job) -> bool {
        self.overlap_minutes(other) > 0
    }

    /// Half-open interval intersection, in minutes. Zero when the
    /// intervals only touch at an endpoint.
    pub fn overlap_minutes(&self, other: &Job) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes().max(0)
    }

    pub fn is_assigned_to(&self, worker_id: Uuid) -> bool {
        self.assigned_worker_ids.contains(&worker_id)
    }
}
