use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::window::BlockScope;
use crate::store::SchedulingStore;

#[derive(Debug, Clone, Serialize)]
pub struct BlockedWorker {
    pub id: Uuid,
    pub name: String,
}

/// Terminal rejection of a job-creation request. Nothing is persisted on
/// this path.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "blocked_type", rename_all = "snake_case")]
pub enum ConflictRejection {
    Company {
        reason: Option<String>,
    },
    Workers {
        blocked_workers: Vec<BlockedWorker>,
    },
}

impl fmt::Display for ConflictRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictRejection::Company { reason: Some(reason) } => {
                write!(f, "company-wide blocked window: {reason}")
            }
            ConflictRejection::Company { reason: None } => {
                write!(f, "company-wide blocked window")
            }
            ConflictRejection::Workers { blocked_workers } => {
                let names: Vec<&str> = blocked_workers
                    .iter()
                    .map(|worker| worker.name.as_str())
                    .collect();
                write!(f, "blocked window for workers: {}", names.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConflictDecision {
    Allowed,
    Rejected(ConflictRejection),
}

/// Pre-commit check of a candidate interval against the provider's
/// blocked windows. A surviving company-scope window rejects regardless
/// of assignment; a worker-scope window rejects only when it intersects
/// the assigned worker set.
pub fn check_creation(
    store: &dyn SchedulingStore,
    provider_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    assigned_worker_ids: &[Uuid],
) -> ConflictDecision {
    let windows = store.windows_covering(provider_id, start.date_naive());

    let mut company_hit = false;
    let mut company_reason: Option<String> = None;
    let mut blocked_ids: Vec<Uuid> = Vec::new();

    for window in windows {
        if !window.applies_to(&start, &end) {
            continue;
        }

        match window.scope {
            BlockScope::Company => {
                // Keep scanning so the most specific reason text wins.
                company_hit = true;
                if company_reason.is_none() {
                    company_reason = window.reason.clone();
                }
            }
            BlockScope::Workers => {
                for id in &window.blocked_worker_ids {
                    if assigned_worker_ids.contains(id) && !blocked_ids.contains(id) {
                        blocked_ids.push(*id);
                    }
                }
            }
        }
    }

    if company_hit {
        return ConflictDecision::Rejected(ConflictRejection::Company {
            reason: company_reason,
        });
    }

    if !blocked_ids.is_empty() {
        let blocked_workers = blocked_ids
            .into_iter()
            .map(|id| BlockedWorker {
                id,
                name: store
                    .worker(id)
                    .map(|worker| worker.name)
                    .unwrap_or_else(|| id.to_string()),
            })
            .collect();
        return ConflictDecision::Rejected(ConflictRejection::Workers { blocked_workers });
    }

    ConflictDecision::Allowed
}

/// Post-commit advisory: workers of the freshly created job who already
/// have another active job overlapping its interval. Non-empty means the
/// job stands but the office should hear about it.
pub fn overlapping_workers(store: &dyn SchedulingStore, job: &Job) -> Vec<Uuid> {
    let mut workers = Vec::new();
    for other in store.overlapping_assigned_jobs(job) {
        for id in &other.assigned_worker_ids {
            if job.assigned_worker_ids.contains(id) && !workers.contains(id) {
                workers.push(*id);
            }
        }
    }
    workers
}
